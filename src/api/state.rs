//! Shared playground state
//!
//! Every policy instance lives in one [`PolicySet`] behind a single
//! `RwLock`, so concurrent requests see the caches serialised exactly as the
//! single-threaded policies expect.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::cache::{
    LruCache, MemoizationCache, MonitoredCache, MultiLevelCache, ShardedCache, TtlCache,
    WriteThroughCache,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Policy ==
/// Policies reachable through the generic `/:policy/...` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Ttl,
    Lru,
    MultiLevel,
    WriteThrough,
    Monitored,
    Sharded,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::Ttl,
        Policy::Lru,
        Policy::MultiLevel,
        Policy::WriteThrough,
        Policy::Monitored,
        Policy::Sharded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Ttl => "ttl",
            Policy::Lru => "lru",
            Policy::MultiLevel => "multi-level",
            Policy::WriteThrough => "write-through",
            Policy::Monitored => "monitored",
            Policy::Sharded => "sharded",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CacheError::InvalidRequest(format!("Unknown cache policy '{s}'")))
    }
}

// == Policy Set ==
/// One instance of every policy, keyed and valued by strings.
#[derive(Debug)]
pub struct PolicySet {
    pub ttl: TtlCache<String, String>,
    pub lru: LruCache<String, String>,
    pub multi_level: MultiLevelCache<String, String>,
    pub write_through: WriteThroughCache<String, String>,
    pub monitored: MonitoredCache<String, String>,
    pub sharded: ShardedCache<String, String>,
    pub memo: MemoizationCache<u64>,
}

impl PolicySet {
    /// Builds every policy from `config`, failing on the first invalid size.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ttl: TtlCache::new(Duration::from_secs(config.ttl_seconds)),
            lru: LruCache::new(config.lru_max_size)?,
            multi_level: MultiLevelCache::new(config.l1_max_size, config.l2_max_size)?,
            write_through: WriteThroughCache::default(),
            monitored: MonitoredCache::new(config.monitored_max_size)?,
            sharded: ShardedCache::new(config.shard_count)?,
            memo: MemoizationCache::new(),
        })
    }

    // == Dispatch ==
    /// Stores `key` in the chosen policy, returning the key evicted to make room.
    pub fn set(&mut self, policy: Policy, key: String, value: String) -> Result<Option<String>> {
        let evicted = match policy {
            Policy::Ttl => {
                self.ttl.set(key, value);
                None
            }
            Policy::Lru => self.lru.set(key, value).map(|(old, _)| old),
            Policy::MultiLevel => {
                self.multi_level.set(key, value);
                None
            }
            Policy::WriteThrough => {
                self.write_through.write(key, value)?;
                None
            }
            Policy::Monitored => {
                self.monitored.set(key, value);
                None
            }
            Policy::Sharded => {
                self.sharded.set(key, value);
                None
            }
        };
        Ok(evicted)
    }

    /// Looks `key` up, counting the access in the policy's own statistics.
    pub fn get(&mut self, policy: Policy, key: &String) -> Option<String> {
        match policy {
            Policy::Ttl => self.ttl.get(key),
            Policy::Lru => self.lru.get(key),
            Policy::MultiLevel => self.multi_level.get(key),
            Policy::WriteThrough => self.write_through.read(key),
            Policy::Monitored => self.monitored.get(key),
            Policy::Sharded => self.sharded.get(key),
        }
    }

    /// Removes `key`, reporting whether it was present.
    pub fn delete(&mut self, policy: Policy, key: &String) -> Result<bool> {
        let existed = match policy {
            Policy::Ttl => self.ttl.delete(key),
            Policy::Lru => self.lru.delete(key),
            Policy::MultiLevel => self.multi_level.delete(key),
            Policy::WriteThrough => self.write_through.delete(key)?,
            Policy::Monitored => self.monitored.delete(key),
            Policy::Sharded => self.sharded.delete(key).is_some(),
        };
        Ok(existed)
    }

    /// Policy-specific statistics as JSON.
    pub fn stats(&self, policy: Policy) -> Result<Value> {
        match policy {
            Policy::Ttl => to_json(&self.ttl.stats()),
            Policy::Lru => Ok(json!({
                "size": self.lru.len(),
                "max_size": self.lru.max_size(),
                "evictions": self.lru.evictions(),
                "keys_by_recency": self.lru.keys_by_recency().collect::<Vec<_>>(),
            })),
            Policy::MultiLevel => to_json(&self.multi_level.stats()),
            Policy::WriteThrough => to_json(&self.write_through.stats()),
            Policy::Monitored => {
                let stats = self.monitored.stats();
                Ok(json!({
                    "sets": stats.sets,
                    "gets": stats.gets,
                    "hits": stats.hits,
                    "misses": stats.misses,
                    "evictions": stats.evictions,
                    "hit_rate": stats.hit_rate(),
                    "entries": self.monitored.len(),
                }))
            }
            Policy::Sharded => Ok(json!({
                "shard_count": self.sharded.shard_count(),
                "entries": self.sharded.len(),
            })),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| CacheError::Internal(e.to_string()))
}

// == App State ==
/// Application state shared across all handlers.
///
/// Contains the policy set wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    pub caches: Arc<RwLock<PolicySet>>,
}

impl AppState {
    /// Creates a new AppState around an existing policy set.
    pub fn new(caches: PolicySet) -> Self {
        Self {
            caches: Arc::new(RwLock::new(caches)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(PolicySet::from_config(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_round_trip_names() {
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(matches!(
            "lfu".parse::<Policy>(),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_policy_set_from_default_config() {
        let set = PolicySet::from_config(&Config::default()).unwrap();
        assert_eq!(set.lru.max_size(), 100);
        assert_eq!(set.sharded.shard_count(), 4);
        assert_eq!(set.ttl.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_dispatch_reaches_each_policy() {
        let mut set = PolicySet::from_config(&Config::default()).unwrap();
        let key = "k".to_string();

        for policy in Policy::ALL {
            assert_eq!(set.set(policy, key.clone(), policy.to_string()).unwrap(), None);
        }
        for policy in Policy::ALL {
            assert_eq!(set.get(policy, &key), Some(policy.to_string()));
            assert!(set.delete(policy, &key).unwrap());
            assert!(!set.delete(policy, &key).unwrap());
            assert_eq!(set.get(policy, &key), None);
        }
    }

    #[test]
    fn test_lru_set_reports_eviction() {
        let config = Config {
            lru_max_size: 1,
            ..Config::default()
        };
        let mut set = PolicySet::from_config(&config).unwrap();

        set.set(Policy::Lru, "a".into(), "1".into()).unwrap();
        let evicted = set.set(Policy::Lru, "b".into(), "2".into()).unwrap();

        assert_eq!(evicted, Some("a".to_string()));
    }

    #[test]
    fn test_stats_shapes() {
        let mut set = PolicySet::from_config(&Config::default()).unwrap();
        set.set(Policy::MultiLevel, "k".into(), "v".into()).unwrap();
        set.get(Policy::MultiLevel, &"k".to_string());

        let stats = set.stats(Policy::MultiLevel).unwrap();
        assert_eq!(stats["l1_hits"], 1);
        assert_eq!(stats["l1_entries"], 1);

        let stats = set.stats(Policy::Ttl).unwrap();
        assert_eq!(stats["ttl_ms"], 60_000);

        let stats = set.stats(Policy::Sharded).unwrap();
        assert_eq!(stats["shard_count"], 4);
    }

    #[test]
    fn test_policy_set_rejects_invalid_config() {
        let config = Config {
            lru_max_size: 0,
            ..Config::default()
        };
        assert!(AppState::from_config(&config).is_err());
    }
}
