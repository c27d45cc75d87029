// src/upstream/mod.rs
//! Headlines provider access.

pub mod newsapi;
pub mod types;

pub use newsapi::NewsApiClient;
pub use types::{HeadlinesQuery, HeadlinesSource, RawResponse};
