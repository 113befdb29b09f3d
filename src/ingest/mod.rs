//! Ingestion support: the parse cache.

mod cache;

pub use cache::ParseCache;
