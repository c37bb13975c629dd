use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// An add-on line item was rejected at enqueue time.
    #[error("invalid add-on item \"{id}\" (amount {amount}): {reason}")]
    InvalidItem {
        id: String,
        amount: i64,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Where an add-to-cart call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, TLS, timeout or an unusable HTTP response.
    Transport,
    /// The platform answered with an error payload.
    Application,
}

/// A single add-to-cart call failed. Recorded in the outcome at the
/// position of the item, never propagated past the submitter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("adding product {product_id} to cart failed: {message}")]
pub struct ItemSubmissionError {
    pub product_id: String,
    pub kind: FailureKind,
    /// Plain-text message suitable for showing to the shopper.
    pub message: String,
}

impl ItemSubmissionError {
    #[must_use]
    pub fn transport(product_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn application(product_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            kind: FailureKind::Application,
            message: message.into(),
        }
    }
}

/// The base item failed, so none of the queued add-ons were attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("submission chain aborted, {skipped_addons} add-on(s) not attempted: {base}")]
pub struct ChainAbortedError {
    pub base: ItemSubmissionError,
    pub skipped_addons: usize,
}
