//! In-memory, site-scoped content cache.
//!
//! Entries live for a fixed [`CACHE_TTL_MS`] and are evicted lazily when a
//! read finds them stale. Keys are namespaced as `<siteId>:<logical-key>` so
//! clients for different sites can share one [`ContentCache`] without
//! colliding. It supports:
//!
//! - Per-section entries, including a cached "not found" marker
//! - Batch entries memoizing the result for one exact id set
//! - Targeted and site-wide invalidation

pub mod clock;
pub mod key;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, batch_key, content_key};
pub use store::{CACHE_TTL_MS, CacheEntry, CachedValue, ContentCache};
