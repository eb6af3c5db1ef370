pub mod cache;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod probe;
