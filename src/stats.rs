//! Statistics and diagnostics types.

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for one map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStats {
    /// Calls to `put`, whatever their outcome.
    pub puts: u64,
    /// Puts that linked a new entry.
    pub inserts: u64,
    /// Puts that overwrote the value of an existing key.
    pub updates: u64,
    /// Puts refused because the map was full.
    pub rejected: u64,
    /// Calls to `get`.
    pub gets: u64,
    /// Gets that found their key.
    pub hits: u64,
    /// Calls to `del`.
    pub dels: u64,
    /// Dels that unlinked an entry.
    pub removed: u64,
    /// Number of lock acquisitions (0 when metrics feature disabled).
    pub lock_acquisitions: u64,
    /// Cumulative lock wait time in nanoseconds (0 when lock-timing disabled).
    pub lock_wait_nanos: u64,
}

/// Thread-safe operation recorder for a map.
#[cfg(feature = "metrics")]
pub(crate) struct OpRecorder {
    inserts: AtomicU64,
    updates: AtomicU64,
    rejected: AtomicU64,
    gets: AtomicU64,
    hits: AtomicU64,
    dels: AtomicU64,
    removed: AtomicU64,
    lock_acquisitions: AtomicU64,
    #[cfg(feature = "lock-timing")]
    lock_wait_nanos: AtomicU64,
}

#[cfg(feature = "metrics")]
impl OpRecorder {
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            gets: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            dels: AtomicU64::new(0),
            removed: AtomicU64::new(0),
            lock_acquisitions: AtomicU64::new(0),
            #[cfg(feature = "lock-timing")]
            lock_wait_nanos: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_get(&self, hit: bool) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_del(&self, removed: bool) {
        self.dels.fetch_add(1, Ordering::Relaxed);
        if removed {
            self.removed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_lock_acquisition(&self) {
        self.lock_acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(feature = "lock-timing")]
    #[inline]
    pub fn record_lock_wait(&self, nanos: u64) {
        self.lock_wait_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OpStats {
        let inserts = self.inserts.load(Ordering::Relaxed);
        let updates = self.updates.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        OpStats {
            puts: inserts + updates + rejected,
            inserts,
            updates,
            rejected,
            gets: self.gets.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            dels: self.dels.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
            #[cfg(feature = "lock-timing")]
            lock_wait_nanos: self.lock_wait_nanos.load(Ordering::Relaxed),
            #[cfg(not(feature = "lock-timing"))]
            lock_wait_nanos: 0,
        }
    }
}

/// Zero-sized placeholder when metrics are disabled.
#[cfg(not(feature = "metrics"))]
pub(crate) struct OpRecorder;

#[cfg(not(feature = "metrics"))]
impl OpRecorder {
    pub fn new() -> Self {
        OpRecorder
    }

    #[inline]
    pub fn record_insert(&self) {}

    #[inline]
    pub fn record_update(&self) {}

    #[inline]
    pub fn record_reject(&self) {}

    #[inline]
    pub fn record_get(&self, _hit: bool) {}

    #[inline]
    pub fn record_del(&self, _removed: bool) {}

    #[inline]
    pub fn record_lock_acquisition(&self) {}

    pub fn snapshot(&self) -> OpStats {
        OpStats::default()
    }
}

impl Default for OpRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of a TsMap, taken under one lock acquisition.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Number of live entries.
    pub size: usize,
    /// Fixed number of buckets.
    pub capacity: usize,
    /// `size / capacity`.
    pub load_factor: f64,
    /// Length of each bucket chain, indexed by bucket.
    pub chain_lengths: Vec<usize>,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Number of buckets with no entries.
    pub empty_buckets: usize,
    /// Operation counters (all 0 when metrics feature disabled).
    pub operations: OpStats,
}

impl Stats {
    pub(crate) fn from_chains(
        size: usize,
        chain_lengths: Vec<usize>,
        operations: OpStats,
    ) -> Self {
        let capacity = chain_lengths.len();
        let longest_chain = chain_lengths.iter().copied().max().unwrap_or(0);
        let empty_buckets = chain_lengths.iter().filter(|&&len| len == 0).count();
        Self {
            size,
            capacity,
            load_factor: size as f64 / capacity as f64,
            chain_lengths,
            longest_chain,
            empty_buckets,
            operations,
        }
    }

    /// Average length of the non-empty chains; 0.0 for an empty map.
    pub fn avg_chain_length(&self) -> f64 {
        let occupied = self.capacity - self.empty_buckets;
        if occupied == 0 {
            0.0
        } else {
            self.size as f64 / occupied as f64
        }
    }
}
