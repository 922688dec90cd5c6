//! # TsMap
//!
//! A fixed-capacity, thread-safe hash map from `i32` keys to `i32` values.
//!
//! The table is an array of `capacity` buckets; a key lives in bucket
//! `key mod capacity`, and keys that collide are chained inside their bucket.
//! One lock owned by the map guards the whole table, so every operation is
//! atomic with respect to every other.
//!
//! The table never resizes. Capacity doubles as the entry limit: once the
//! load factor reaches 1.0, new keys are refused with
//! [`Error::CapacityExceeded`] until a delete frees a slot.
//!
//! ## Features
//!
//! - **Explicit outcomes**: absence is `None`, a full map is an `Err`; no
//!   integer is reserved as a sentinel
//! - **Thread-Safe**: share one map between threads through an `Arc`
//! - **Introspectable**: chain lengths, load factor, invariant checks and
//!   optional operation counters (`metrics` feature)
//! - **Stress driver**: the [`workload`] module and the `tsmap` binary hammer
//!   one map from many threads with reproducible random operations
//!
//! ## Example
//!
//! ```rust
//! use tsmap::TsMap;
//!
//! let map = TsMap::new(100)?;
//!
//! // Insert values
//! assert_eq!(map.put(1, 10)?, None);
//! assert_eq!(map.put(1, 11)?, Some(10));
//!
//! // Read and remove
//! assert_eq!(map.get(1), Some(11));
//! assert_eq!(map.del(1), Some(11));
//! assert_eq!(map.get(1), None);
//!
//! // Inspect the table
//! map.put(7, 70)?;
//! let stats = map.stats();
//! println!("{} entries, load factor {}", stats.size, stats.load_factor);
//! print!("{}", map);
//! # Ok::<(), tsmap::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use tsmap::TsMapBuilder;
//!
//! let map = TsMapBuilder::new()
//!     .capacity(1024)?  // Must be greater than 0
//!     .build()?;
//! assert_eq!(map.capacity(), 1024);
//! # Ok::<(), tsmap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

mod bucket;
/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Bucket index computation.
pub mod hash;
/// Iterator implementations.
pub mod iter;
/// Statistics and metrics collection.
pub mod stats;
/// Main TsMap implementation.
pub mod tsmap;
pub mod workload;

// Re-export main types
pub use config::{Config, TsMapBuilder};
pub use error::Error;
pub use stats::{OpStats, Stats};
pub use tsmap::TsMap;
pub use workload::WorkloadConfig;
