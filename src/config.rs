//! Configuration Module
//!
//! Handles loading and validating playground configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Playground configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL in seconds for the TTL cache
    pub ttl_seconds: u64,
    /// Capacity of the LRU cache
    pub lru_max_size: usize,
    /// Capacity of the multi-level cache's fast tier
    pub l1_max_size: usize,
    /// Capacity of the multi-level cache's slow tier
    pub l2_max_size: usize,
    /// Capacity of the monitored cache
    pub monitored_max_size: usize,
    /// Number of partitions in the sharded cache
    pub shard_count: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background TTL sweep interval in seconds
    pub cleanup_interval: u64,
}

/// Reads `name` and parses it, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_SECONDS` - TTL cache lifetime (default: 60)
    /// - `LRU_MAX_SIZE` - LRU capacity (default: 100)
    /// - `L1_MAX_SIZE` / `L2_MAX_SIZE` - tier capacities (default: 10 / 100)
    /// - `MONITORED_MAX_SIZE` - monitored cache capacity (default: 10000)
    /// - `SHARD_COUNT` - sharded cache partitions (default: 4)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - TTL sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: env_or("TTL_SECONDS", defaults.ttl_seconds),
            lru_max_size: env_or("LRU_MAX_SIZE", defaults.lru_max_size),
            l1_max_size: env_or("L1_MAX_SIZE", defaults.l1_max_size),
            l2_max_size: env_or("L2_MAX_SIZE", defaults.l2_max_size),
            monitored_max_size: env_or("MONITORED_MAX_SIZE", defaults.monitored_max_size),
            shard_count: env_or("SHARD_COUNT", defaults.shard_count),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Rejects sizes and intervals that would make a cache unusable.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("LRU_MAX_SIZE", self.lru_max_size),
            ("L1_MAX_SIZE", self.l1_max_size),
            ("L2_MAX_SIZE", self.l2_max_size),
            ("MONITORED_MAX_SIZE", self.monitored_max_size),
            ("SHARD_COUNT", self.shard_count),
        ];

        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(CacheError::InvalidConfig(format!("{name} must be positive")));
        }
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "CLEANUP_INTERVAL must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_seconds: 60,
            lru_max_size: 100,
            l1_max_size: 10,
            l2_max_size: 100,
            monitored_max_size: 10_000,
            shard_count: 4,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
