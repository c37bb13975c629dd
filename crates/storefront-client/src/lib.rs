pub mod client;
pub mod error;
pub mod graphql;
pub mod html;
pub mod types;

mod retry;

pub use client::StorefrontClient;
pub use error::ClientError;
pub use html::strip_html;
pub use types::{AddonCatalog, OptionChangeResponse, ProductMeta, ProductVariantInfo};
