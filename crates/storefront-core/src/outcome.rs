use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::addon::AddonItem;
use crate::cart::CartItemAdded;
use crate::error::{ChainAbortedError, ItemSubmissionError};

/// Result of the primary item. A failure aborts the chain.
pub type BaseResult = Result<CartItemAdded, ChainAbortedError>;

/// Result of one queued add-on, kept alongside the item it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonResult {
    pub item: AddonItem,
    pub result: Result<CartItemAdded, ItemSubmissionError>,
}

impl AddonResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything that happened during one submission attempt.
#[derive(Debug, Clone)]
pub struct CartSubmissionOutcome {
    pub attempt_id: Uuid,
    pub base: BaseResult,
    /// Same order as the queue. Empty when the base item failed.
    pub addon_results: Vec<AddonResult>,
    /// Add-ons never attempted because a newer submission began first.
    pub discarded: Vec<AddonItem>,
    pub completed_at: DateTime<Utc>,
}

impl CartSubmissionOutcome {
    #[must_use]
    pub fn base_succeeded(&self) -> bool {
        self.base.is_ok()
    }

    /// `true` when the base item and every add-on were added.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.base_succeeded()
            && self.discarded.is_empty()
            && self.addon_results.iter().all(AddonResult::is_ok)
    }

    #[must_use]
    pub fn was_superseded(&self) -> bool {
        !self.discarded.is_empty()
    }

    #[must_use]
    pub fn chain_aborted(&self) -> Option<&ChainAbortedError> {
        self.base.as_ref().err()
    }

    /// Every failed call in attempt order, base first.
    pub fn failures(&self) -> impl Iterator<Item = &ItemSubmissionError> {
        self.chain_aborted().map(|aborted| &aborted.base).into_iter().chain(
            self.addon_results
                .iter()
                .filter_map(|r| r.result.as_ref().err()),
        )
    }

    /// The most recent cart line added in this attempt, used to open the
    /// cart preview or pick a redirect target.
    #[must_use]
    pub fn last_added(&self) -> Option<&CartItemAdded> {
        self.addon_results
            .iter()
            .rev()
            .find_map(|r| r.result.as_ref().ok())
            .or_else(|| self.base.as_ref().ok())
    }

    /// Where to send the shopper when no preview is available: the last
    /// reported cart URL, else `fallback`.
    #[must_use]
    pub fn redirect_url<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.last_added()
            .and_then(|added| added.cart_url.as_deref())
            .unwrap_or(fallback)
    }
}
