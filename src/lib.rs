// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregator;
pub mod api;
pub mod article;
pub mod config;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod normalize;
pub mod pagination;
pub mod sequencer;
pub mod time_ago;
pub mod upstream;

// ---- Re-exports for stable public API ----
pub use crate::aggregator::{Aggregator, AggregatorState, FallbackReason, Outcome};
pub use crate::api::{router, AppState};
pub use crate::article::{Article, PageResult};
pub use crate::config::{Credential, Settings, UpstreamEndpoint};
pub use crate::error::FetchError;
pub use crate::fallback::generate_fallback;
pub use crate::normalize::normalize;
pub use crate::pagination::{paginate, PageRequest, PaginationInfo};
pub use crate::sequencer::FeedView;
pub use crate::upstream::{HeadlinesSource, NewsApiClient, RawResponse};
