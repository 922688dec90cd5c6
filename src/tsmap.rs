use crate::bucket::Bucket;
use crate::config::{Config, DEFAULT_CAPACITY};
use crate::error::Error;
use crate::hash::bucket_index;
use crate::iter::SnapshotIter;
use crate::stats::{OpRecorder, OpStats, Stats};
use hashbrown::HashSet;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use tracing::{debug, trace};

/// Load factor at which the map stops admitting new keys.
pub const MAX_LOAD_FACTOR: f64 = 1.0;

/// Bucket array plus live entry count; only ever touched under the map lock.
struct Table {
    buckets: Box<[Bucket]>,
    size: usize,
}

impl Table {
    fn new(capacity: usize) -> Self {
        Self {
            buckets: (0..capacity).map(|_| Bucket::new()).collect(),
            size: 0,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    #[inline]
    fn bucket(&self, key: i32) -> &Bucket {
        &self.buckets[bucket_index(key, self.capacity())]
    }

    #[inline]
    fn bucket_mut(&mut self, key: i32) -> &mut Bucket {
        let index = bucket_index(key, self.capacity());
        &mut self.buckets[index]
    }

    fn check(&self) -> Result<(), Error> {
        let capacity = self.capacity();
        let mut seen = HashSet::with_capacity(self.size);
        let mut reachable = 0usize;

        for (index, bucket) in self.buckets.iter().enumerate() {
            for (key, _) in bucket.iter() {
                reachable += 1;
                let expected = bucket_index(key, capacity);
                if expected != index {
                    return Err(Error::Corrupted(format!(
                        "key {} found in bucket {}, belongs in bucket {}",
                        key, index, expected
                    )));
                }
                if !seen.insert(key) {
                    return Err(Error::Corrupted(format!("duplicate key {}", key)));
                }
            }
        }

        if reachable != self.size {
            return Err(Error::Corrupted(format!(
                "size is {} but {} entries are reachable",
                self.size, reachable
            )));
        }
        Ok(())
    }
}

/// Fixed-capacity, thread-safe map from `i32` keys to `i32` values.
///
/// Keys hash to bucket `key mod capacity`; collisions chain inside the
/// bucket. A single lock guards the whole table: `put`, `del` and `update`
/// take it exclusively, reads take it shared. Every operation acquires it
/// once and holds it for its full duration, so operations are linearizable.
///
/// The table never grows. Once `len() == capacity()` new keys are refused
/// with [`Error::CapacityExceeded`] until a `del` frees a slot; overwriting
/// an existing key is always allowed.
///
/// # Example
///
/// ```rust
/// use tsmap::{Error, TsMap};
///
/// let map = TsMap::new(1)?;
/// assert_eq!(map.put(5, 42)?, None);
/// assert_eq!(map.put(9, 7), Err(Error::CapacityExceeded { capacity: 1 }));
/// assert_eq!(map.del(5), Some(42));
/// assert_eq!(map.put(9, 7)?, None);
/// # Ok::<(), tsmap::Error>(())
/// ```
pub struct TsMap {
    table: RwLock<Table>,
    capacity: usize,
    ops: OpRecorder,
}

impl TsMap {
    /// Create a map with `capacity` buckets. Fails if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::with_config(Config::new().capacity(capacity)?)
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        if config.capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self::from_capacity(config.capacity))
    }

    fn from_capacity(capacity: usize) -> Self {
        trace!(capacity, "creating map");
        Self {
            table: RwLock::new(Table::new(capacity)),
            capacity,
            ops: OpRecorder::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.table.read();
        #[cfg(feature = "lock-timing")]
        self.ops.record_lock_wait(start.elapsed().as_nanos() as u64);
        self.ops.record_lock_acquisition();
        guard
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.table.write();
        #[cfg(feature = "lock-timing")]
        self.ops.record_lock_wait(start.elapsed().as_nanos() as u64);
        self.ops.record_lock_acquisition();
        guard
    }

    /// Associate `value` with `key`.
    ///
    /// Returns `Ok(Some(old))` when the key was present and its value got
    /// replaced, `Ok(None)` when a new entry was linked, and
    /// [`Error::CapacityExceeded`] when the key is new but the map is full.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tsmap::TsMap;
    ///
    /// let map = TsMap::new(8)?;
    /// assert_eq!(map.put(1, 10)?, None);
    /// assert_eq!(map.put(1, 20)?, Some(10));
    /// assert_eq!(map.len(), 1);
    /// # Ok::<(), tsmap::Error>(())
    /// ```
    pub fn put(&self, key: i32, value: i32) -> Result<Option<i32>, Error> {
        let mut table = self.write();

        if let Some(slot) = table.bucket_mut(key).get_mut(key) {
            let old = std::mem::replace(slot, value);
            self.ops.record_update();
            return Ok(Some(old));
        }

        if table.load_factor() >= MAX_LOAD_FACTOR {
            self.ops.record_reject();
            debug!(key, capacity = table.capacity(), "map full, rejecting new key");
            return Err(Error::CapacityExceeded {
                capacity: table.capacity(),
            });
        }

        table.bucket_mut(key).push_front(key, value);
        table.size += 1;
        self.ops.record_insert();
        Ok(None)
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: i32) -> Option<i32> {
        let table = self.read();
        let result = table.bucket(key).get(key);
        self.ops.record_get(result.is_some());
        result
    }

    /// Remove `key`, returning the value it held.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tsmap::TsMap;
    ///
    /// let map = TsMap::new(8)?;
    /// map.put(3, 30)?;
    /// assert_eq!(map.del(3), Some(30));
    /// assert_eq!(map.del(3), None);
    /// assert!(map.get(3).is_none());
    /// # Ok::<(), tsmap::Error>(())
    /// ```
    pub fn del(&self, key: i32) -> Option<i32> {
        let mut table = self.write();
        let result = table.bucket_mut(key).remove(key);
        if result.is_some() {
            table.size -= 1;
        }
        self.ops.record_del(result.is_some());
        result
    }

    /// Apply `f` to the value stored under `key`, returning the new value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tsmap::{Error, TsMap};
    ///
    /// let map = TsMap::new(8)?;
    /// map.put(1, 0)?;
    /// assert_eq!(map.update(1, |v| *v += 5)?, 5);
    /// assert_eq!(map.update(2, |v| *v += 5), Err(Error::KeyNotFound));
    /// # Ok::<(), tsmap::Error>(())
    /// ```
    pub fn update<F>(&self, key: i32, f: F) -> Result<i32, Error>
    where
        F: FnOnce(&mut i32),
    {
        let mut table = self.write();
        let slot = table
            .bucket_mut(key)
            .get_mut(key)
            .ok_or(Error::KeyNotFound)?;
        f(slot);
        let value = *slot;
        self.ops.record_update();
        Ok(value)
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: i32) -> bool {
        self.read().bucket(key).get(key).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.read().size
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed number of buckets, which is also the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the map currently refuses new keys.
    pub fn is_full(&self) -> bool {
        self.read().load_factor() >= MAX_LOAD_FACTOR
    }

    /// `len() / capacity()`, read under the lock.
    pub fn load_factor(&self) -> f64 {
        self.read().load_factor()
    }

    /// Copy every bucket chain, in bucket order and chain order.
    pub fn snapshot(&self) -> Vec<Vec<(i32, i32)>> {
        let table = self.read();
        table
            .buckets
            .iter()
            .map(|bucket| bucket.iter().collect())
            .collect()
    }

    /// Create a snapshot-based iterator over all key-value pairs.
    ///
    /// The entries are copied under one lock acquisition, so the iterator
    /// sees a consistent view and never blocks writers while it is consumed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tsmap::TsMap;
    ///
    /// let map = TsMap::new(8)?;
    /// map.put(1, 10)?;
    /// map.put(2, 20)?;
    ///
    /// let mut entries: Vec<_> = map.iter_snapshot().collect();
    /// entries.sort();
    /// assert_eq!(entries, vec![(1, 10), (2, 20)]);
    /// # Ok::<(), tsmap::Error>(())
    /// ```
    pub fn iter_snapshot(&self) -> SnapshotIter {
        let table = self.read();
        let mut entries = Vec::with_capacity(table.size);
        for bucket in table.buckets.iter() {
            entries.extend(bucket.iter());
        }
        SnapshotIter::new(entries)
    }

    /// Verify size accounting, bucket placement and key uniqueness.
    pub fn check_invariants(&self) -> Result<(), Error> {
        self.read().check()
    }

    /// Get detailed statistics about the table and its operations.
    pub fn stats(&self) -> Stats {
        let table = self.read();
        let chain_lengths = table.buckets.iter().map(Bucket::len).collect();
        Stats::from_chains(table.size, chain_lengths, self.ops.snapshot())
    }

    /// Operation counters only (all 0 when metrics feature disabled).
    pub fn op_stats(&self) -> OpStats {
        self.ops.snapshot()
    }

    /// Release every entry and the table, returning how many entries were
    /// released.
    ///
    /// Taking `self` by value means no other thread can still be operating
    /// on the map. Dropping a map releases everything as well.
    pub fn teardown(self) -> usize {
        let mut table = self.table.into_inner();
        let released: usize = table.buckets.iter_mut().map(Bucket::clear).sum();
        debug_assert_eq!(released, table.size);
        table.size = 0;
        debug!(released, capacity = self.capacity, "map torn down");
        released
    }
}

impl Default for TsMap {
    fn default() -> Self {
        Self::from_capacity(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for TsMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsMap")
            .field("capacity", &self.capacity)
            .field("size", &self.len())
            .finish()
    }
}

/// One line per bucket: `[i] -> (k,v) -> (k,v)`.
impl fmt::Display for TsMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.read();
        for (index, bucket) in table.buckets.iter().enumerate() {
            write!(f, "[{}] -> ", index)?;
            for (position, (key, value)) in bucket.iter().enumerate() {
                if position > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "({},{})", key, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
