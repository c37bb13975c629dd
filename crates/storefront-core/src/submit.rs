//! Sequential add-to-cart chain.
//!
//! The base item is added first. Only if that succeeds are the queued
//! add-ons submitted, one call at a time in queue order, each awaited
//! before the next is issued. A failing add-on is recorded and the walk
//! moves on to the next one. Nothing is retried.
//!
//! Cart writes from one submitter never overlap, even across attempts.
//! Starting a new attempt supersedes any older one still running: the
//! older chain finishes the call it has in flight, then discards the rest
//! of its queue.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::addon::AddonQueue;
use crate::cart::{AddToCartRequest, CartApi};
use crate::error::ChainAbortedError;
use crate::outcome::{AddonResult, CartSubmissionOutcome};

/// Drives submission chains against a [`CartApi`].
pub struct CartSubmitter<A> {
    api: A,
    in_flight: AtomicUsize,
    /// Bumped by every attempt; an attempt is current while it matches.
    generation: AtomicU64,
    /// Held for the duration of each cart write.
    write_lock: Mutex<()>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        if counter.fetch_add(1, Ordering::SeqCst) > 0 {
            tracing::warn!("cart submission started while another is in flight; superseding it");
        }
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<A: CartApi> CartSubmitter<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            in_flight: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// `true` while a chain is running. The add-to-cart trigger should stay
    /// disabled until this turns `false` again.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Submits `base`, then every add-on in `queue`.
    ///
    /// The queue is consumed; build a new one for every attempt.
    pub async fn submit(&self, base: &AddToCartRequest, queue: AddonQueue) -> CartSubmissionOutcome {
        self.submit_with(base, queue, |_| {}).await
    }

    /// Like [`Self::submit`], calling `on_complete` exactly once with the
    /// finished outcome before returning it.
    pub async fn submit_with<F>(
        &self,
        base: &AddToCartRequest,
        mut queue: AddonQueue,
        on_complete: F,
    ) -> CartSubmissionOutcome
    where
        F: FnOnce(&CartSubmissionOutcome),
    {
        let _in_flight = InFlight::enter(&self.in_flight);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let attempt_id = Uuid::new_v4();

        tracing::info!(
            %attempt_id,
            product_id = %base.product_id,
            quantity = base.quantity,
            addons = queue.len(),
            "submitting cart chain"
        );

        let base_result = {
            let _write = self.write_lock.lock().await;
            self.api.add_to_cart(base).await
        };
        let added = match base_result {
            Ok(added) => added,
            Err(err) => {
                tracing::warn!(
                    %attempt_id,
                    product_id = %base.product_id,
                    error = %err,
                    "base item failed; add-ons not attempted"
                );
                let skipped_addons = queue.len();
                queue.clear();
                let outcome = CartSubmissionOutcome {
                    attempt_id,
                    base: Err(ChainAbortedError {
                        base: err,
                        skipped_addons,
                    }),
                    addon_results: Vec::new(),
                    discarded: Vec::new(),
                    completed_at: Utc::now(),
                };
                on_complete(&outcome);
                return outcome;
            }
        };

        let mut addon_results = Vec::with_capacity(queue.len());
        let mut discarded = Vec::new();
        let mut pending = queue.drain().enumerate();
        while let Some((position, item)) = pending.next() {
            let write = self.write_lock.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                drop(write);
                discarded.push(item);
                discarded.extend(pending.by_ref().map(|(_, item)| item));
                tracing::warn!(
                    %attempt_id,
                    position,
                    discarded = discarded.len(),
                    "superseded by a newer submission; remaining add-ons discarded"
                );
                break;
            }

            tracing::debug!(
                %attempt_id,
                position,
                product_id = %item.id,
                amount = item.amount,
                "adding add-on"
            );

            let result = self.api.add_to_cart(&AddToCartRequest::addon(&item)).await;
            drop(write);
            if let Err(err) = &result {
                tracing::warn!(
                    %attempt_id,
                    position,
                    product_id = %item.id,
                    error = %err,
                    "add-on failed; continuing with remaining add-ons"
                );
            }
            addon_results.push(AddonResult { item, result });
        }

        let outcome = CartSubmissionOutcome {
            attempt_id,
            base: Ok(added),
            addon_results,
            discarded,
            completed_at: Utc::now(),
        };

        tracing::info!(
            %attempt_id,
            addons = outcome.addon_results.len(),
            failed = outcome.failures().count(),
            discarded = outcome.discarded.len(),
            "cart chain complete"
        );

        on_complete(&outcome);
        outcome
    }
}

#[cfg(test)]
#[path = "submit_test.rs"]
mod tests;
