//! Remote data synchronization: keyed caching, request deduplication,
//! invalidation after writes, and ordered fallback lookups.
//!
//! # Keys
//!
//! Cached reads are identified by a [`QueryKey`] whose first segment names
//! the resource:
//!
//! ```text
//! ["recipes"]                     all public recipes
//! ["recipes", "detail", "<id>"]   one recipe
//! ["recipes", "my", "<uid>"]      the user's own recipes
//! ```
//!
//! Invalidating `["recipes"]` marks all three stale.

mod cache;
mod client;
mod fallback;
mod key;

pub use cache::{CacheEntry, MemoryCache, QueryCache};
pub use client::{QueryClient, QueryStatus, DEFAULT_STALE_TIME};
pub use fallback::FallbackChain;
pub use key::QueryKey;
