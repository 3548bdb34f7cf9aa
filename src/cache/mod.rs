//! Cache Module
//!
//! In-memory retention policies sharing the [`Cache`] interface: TTL expiry,
//! LRU eviction, memoization, two-level tiering, write-through, monitoring
//! and sharding.

mod clock;
mod entry;
mod fifo;
mod lru;
mod memo;
mod monitored;
mod multi_level;
mod sharded;
mod stats;
mod store;
mod traits;
mod ttl;
mod write_through;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, MockClock, SystemClock};
pub use entry::CacheEntry;
pub use fifo::FifoStore;
pub use lru::{LruCache, LruTracker};
pub use memo::{MemoStats, MemoizationCache};
pub use monitored::{
    KeyHits, KeyStats, MonitorReport, MonitoredCache, DEFAULT_MONITORED_MAX_SIZE, TOP_KEYS,
};
pub use multi_level::{MultiLevelCache, MultiLevelStats};
pub use sharded::{ShardSelector, ShardSnapshot, ShardedCache};
pub use stats::CacheStats;
pub use store::KeyValueStore;
pub use traits::Cache;
pub use ttl::{TtlCache, TtlStats, DEFAULT_TTL};
pub use write_through::{BackingStore, MemoryBackingStore, WriteThroughCache, WriteThroughStats};
