//! Storefront product-page logic with no HTTP dependency.
//!
//! Resolves option controls into variant descriptors, queues add-on line
//! items, and drives the sequential add-to-cart chain against any
//! [`CartApi`] implementation.

pub mod addon;
pub mod app_config;
pub mod cart;
pub mod config;
pub mod error;
pub mod options;
pub mod outcome;
pub mod pricing;
pub mod stock;
pub mod submit;
pub mod variant;

pub use addon::{AddonItem, AddonLine, AddonQueue, AddonSelection};
pub use app_config::{AppConfig, Environment};
pub use cart::{AddToCartRequest, CartApi, CartItemAdded};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ChainAbortedError, ConfigError, CoreError, FailureKind, ItemSubmissionError};
pub use options::{ChoiceInput, OptionControl, OptionKind, OptionValue, SelectOption, SelectState};
pub use outcome::{AddonResult, BaseResult, CartSubmissionOutcome};
pub use pricing::{addon_total, AddonOffer};
pub use stock::{attribute_availability, AttributeAvailability, ProductAttributesData};
pub use submit::CartSubmitter;
pub use variant::{resolve, resolve_from, OptionStateSource, VariantDescriptor, UNSATISFIED};
