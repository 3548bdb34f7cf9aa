//! Cache Lab - in-memory caching policies behind one interface
//!
//! Provides TTL expiry, LRU eviction, memoization, two-tier, write-through,
//! monitored and sharded caches, plus an HTTP playground that exposes them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
