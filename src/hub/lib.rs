pub mod config;
pub mod github;
pub mod hash;
pub mod judge;
pub mod oauth;
pub mod stats;
pub mod storage;
pub mod submission;
pub mod upload;
pub mod watcher;

/// Version marker stored next to the hash cache.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
