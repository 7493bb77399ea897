pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod pipeline;
pub mod query;
pub mod types;
pub mod wait;

pub use cache::{fingerprint, CacheEntry, CacheStore, CacheTable};
pub use client::{FetchedPages, SellerApiClient};
pub use error::IngestError;
pub use normalize::{derive_contact_urls, normalize_page, normalize_seller};
pub use pipeline::{BatchOrigin, SellerBatch, SellerPipeline};
pub use query::SellerQuery;
pub use types::{PagePayload, RawSeller};
pub use wait::WaitPolicy;
