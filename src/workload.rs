//! Concurrent stress driver.
//!
//! Spawns one worker per configured thread. Each worker replays a
//! pseudo-random sequence of `put`/`get`/`del` calls against a single shared
//! [`TsMap`]; the sequence is seeded by the worker's index, so a worker always
//! issues the same calls, while the interleaving across workers is up to the
//! scheduler.

use crate::config::TsMapBuilder;
use crate::error::Error;
use crate::tsmap::TsMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Operations each worker performs by default.
pub const OPS_PER_THREAD: usize = 1000;
/// Keys are drawn uniformly from `[0, KEY_RANGE)`.
pub const KEY_RANGE: i32 = 10_000;
/// Values are drawn uniformly from `[0, VALUE_RANGE)`.
pub const VALUE_RANGE: i32 = 10_000;

/// Parameters of one stress run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Number of worker threads.
    pub threads: usize,
    /// Capacity of the shared map.
    pub capacity: usize,
    /// Operations per worker.
    pub ops_per_thread: usize,
    /// Exclusive upper bound for generated keys.
    pub key_range: i32,
    /// Exclusive upper bound for generated values.
    pub value_range: i32,
}

impl WorkloadConfig {
    /// Config with the default operation count and key/value ranges.
    pub fn new(threads: usize, capacity: usize) -> Result<Self, Error> {
        if threads == 0 {
            return Err(Error::InvalidArgument(
                "Invalid number of threads: 0".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            threads,
            capacity,
            ops_per_thread: OPS_PER_THREAD,
            key_range: KEY_RANGE,
            value_range: VALUE_RANGE,
        })
    }

    /// Parse `<program> <num threads> <hashmap capacity>`.
    ///
    /// The first item is the program name and only shows up in the usage
    /// message.
    pub fn from_args<I, S>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let program = args.first().map(|s| s.as_ref()).unwrap_or("tsmap");
        if args.len() != 3 {
            return Err(Error::InvalidArgument(format!(
                "Usage: {} <num threads> <hashmap capacity>",
                program
            )));
        }

        let threads = parse_positive(args[1].as_ref(), "Invalid number of threads")?;
        let capacity = parse_positive(args[2].as_ref(), "Invalid hashmap capacity")?;
        Self::new(threads, capacity)
    }

    /// Override the number of operations each worker performs.
    pub fn ops_per_thread(mut self, ops: usize) -> Self {
        self.ops_per_thread = ops;
        self
    }

    /// Override the key range. Must be greater than 0.
    pub fn key_range(mut self, range: i32) -> Result<Self, Error> {
        if range <= 0 {
            return Err(Error::InvalidArgument(format!(
                "Invalid key range: {}",
                range
            )));
        }
        self.key_range = range;
        Ok(self)
    }
}

fn parse_positive(arg: &str, context: &str) -> Result<usize, Error> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::InvalidArgument(format!("{}: {}", context, arg)))
}

/// One map call issued by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `put(key, value)`
    Put {
        /// Key to insert or overwrite.
        key: i32,
        /// Value to store.
        value: i32,
    },
    /// `get(key)`
    Get {
        /// Key to look up.
        key: i32,
    },
    /// `del(key)`
    Del {
        /// Key to remove.
        key: i32,
    },
}

/// Reproducible stream of random operations for one worker.
///
/// Every step draws a key, then a value, then picks one of the three
/// operations with equal probability. `Get` and `Del` discard the value.
#[derive(Debug, Clone)]
pub struct OpStream {
    rng: StdRng,
    remaining: usize,
    key_range: i32,
    value_range: i32,
}

impl OpStream {
    /// Stream for the worker with the given seed.
    pub fn new(seed: u64, config: &WorkloadConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            remaining: config.ops_per_thread,
            key_range: config.key_range,
            value_range: config.value_range,
        }
    }
}

impl Iterator for OpStream {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let key = self.rng.gen_range(0..self.key_range);
        let value = self.rng.gen_range(0..self.value_range);
        let op = match self.rng.gen_range(0..3) {
            0 => Op::Put { key, value },
            1 => Op::Get { key },
            _ => Op::Del { key },
        };
        Some(op)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OpStream {}

/// What one worker observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerTally {
    /// Puts that linked a new entry.
    pub inserted: usize,
    /// Puts that overwrote an existing value.
    pub updated: usize,
    /// Puts refused because the map was full.
    pub rejected: usize,
    /// Gets that found their key.
    pub hits: usize,
    /// Gets that did not.
    pub misses: usize,
    /// Dels that removed an entry.
    pub removed: usize,
    /// Dels whose key was absent.
    pub not_found: usize,
}

impl WorkerTally {
    /// Issue `op` against `map` and count the outcome.
    pub fn apply(&mut self, map: &TsMap, op: Op) {
        match op {
            Op::Put { key, value } => match map.put(key, value) {
                Ok(None) => self.inserted += 1,
                Ok(Some(_)) => self.updated += 1,
                Err(_) => self.rejected += 1,
            },
            Op::Get { key } => match map.get(key) {
                Some(_) => self.hits += 1,
                None => self.misses += 1,
            },
            Op::Del { key } => match map.del(key) {
                Some(_) => self.removed += 1,
                None => self.not_found += 1,
            },
        }
    }

    /// Total operations counted.
    pub fn total(&self) -> usize {
        self.inserted
            + self.updated
            + self.rejected
            + self.hits
            + self.misses
            + self.removed
            + self.not_found
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &WorkerTally) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.rejected += other.rejected;
        self.hits += other.hits;
        self.misses += other.misses;
        self.removed += other.removed;
        self.not_found += other.not_found;
    }
}

/// Result of a completed run: the final map, now exclusively owned, and
/// what each worker saw.
#[derive(Debug)]
pub struct Report {
    /// The map after every worker joined.
    pub map: TsMap,
    /// Per-worker tallies, indexed by worker.
    pub tallies: Vec<WorkerTally>,
}

impl Report {
    /// Sum of all worker tallies.
    pub fn totals(&self) -> WorkerTally {
        let mut totals = WorkerTally::default();
        for tally in &self.tallies {
            totals.merge(tally);
        }
        totals
    }

    /// Release the map, returning how many entries were released.
    pub fn teardown(self) -> usize {
        self.map.teardown()
    }
}

fn worker(map: &TsMap, ops: OpStream) -> WorkerTally {
    let mut tally = WorkerTally::default();
    for op in ops {
        tally.apply(map, op);
    }
    tally
}

/// Run the workload to completion.
///
/// Fails with [`Error::ThreadFailure`] if a worker cannot be spawned or
/// panics, and with [`Error::Corrupted`] if the final table does not hold
/// its invariants.
pub fn run(config: &WorkloadConfig) -> Result<Report, Error> {
    let map = Arc::new(TsMapBuilder::new().capacity(config.capacity)?.build()?);
    info!(
        threads = config.threads,
        capacity = config.capacity,
        ops_per_thread = config.ops_per_thread,
        "starting workload"
    );

    let mut handles = Vec::with_capacity(config.threads);
    for id in 0..config.threads {
        let map = Arc::clone(&map);
        let ops = OpStream::new(id as u64, config);
        let handle = thread::Builder::new()
            .name(format!("tsmap-worker-{}", id))
            .spawn(move || worker(&map, ops))
            .map_err(|e| {
                warn!(worker = id, error = %e, "spawn failed");
                Error::ThreadFailure(format!("Error creating thread {}: {}", id, e))
            })?;
        handles.push(handle);
    }

    let mut tallies = Vec::with_capacity(handles.len());
    for (id, handle) in handles.into_iter().enumerate() {
        let tally = handle.join().map_err(|_| {
            warn!(worker = id, "worker panicked");
            Error::ThreadFailure(format!("Error joining thread {}", id))
        })?;
        debug!(worker = id, ?tally, "worker finished");
        tallies.push(tally);
    }

    map.check_invariants()?;
    let map = Arc::try_unwrap(map)
        .map_err(|_| Error::ThreadFailure("map still shared after join".to_string()))?;

    info!(size = map.len(), load_factor = map.load_factor(), "workload finished");
    Ok(Report { map, tallies })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_ok() {
        let config = WorkloadConfig::from_args(["tsmap", "4", "100"]).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.ops_per_thread, OPS_PER_THREAD);
        assert_eq!(config.key_range, KEY_RANGE);
    }

    #[test]
    fn test_from_args_usage() {
        let err = WorkloadConfig::from_args(["prog", "4"]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument("Usage: prog <num threads> <hashmap capacity>".to_string())
        );
        assert!(WorkloadConfig::from_args(["prog", "1", "2", "3"]).is_err());
        assert!(WorkloadConfig::from_args(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_from_args_rejects_non_positive() {
        assert_eq!(
            WorkloadConfig::from_args(["prog", "0", "10"]).unwrap_err(),
            Error::InvalidArgument("Invalid number of threads: 0".to_string())
        );
        assert_eq!(
            WorkloadConfig::from_args(["prog", "-2", "10"]).unwrap_err(),
            Error::InvalidArgument("Invalid number of threads: -2".to_string())
        );
        assert_eq!(
            WorkloadConfig::from_args(["prog", "2", "0"]).unwrap_err(),
            Error::InvalidArgument("Invalid hashmap capacity: 0".to_string())
        );
        assert!(WorkloadConfig::from_args(["prog", "abc", "10"]).is_err());
        assert!(WorkloadConfig::from_args(["prog", "2", "-5"]).is_err());
    }

    #[test]
    fn test_op_stream_is_reproducible() {
        let config = WorkloadConfig::new(1, 10).unwrap();
        let first: Vec<Op> = OpStream::new(3, &config).collect();
        let second: Vec<Op> = OpStream::new(3, &config).collect();
        let other: Vec<Op> = OpStream::new(4, &config).collect();

        assert_eq!(first.len(), OPS_PER_THREAD);
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_op_stream_ranges() {
        let config = WorkloadConfig::new(1, 10)
            .unwrap()
            .ops_per_thread(5000)
            .key_range(50)
            .unwrap();
        let mut kinds = [0usize; 3];
        for op in OpStream::new(0, &config) {
            match op {
                Op::Put { key, value } => {
                    assert!((0..50).contains(&key));
                    assert!((0..VALUE_RANGE).contains(&value));
                    kinds[0] += 1;
                }
                Op::Get { key } => {
                    assert!((0..50).contains(&key));
                    kinds[1] += 1;
                }
                Op::Del { key } => {
                    assert!((0..50).contains(&key));
                    kinds[2] += 1;
                }
            }
        }
        assert!(kinds.iter().all(|&n| n > 1000));
    }

    #[test]
    fn test_run_single_thread_accounting() {
        let config = WorkloadConfig::new(1, 100).unwrap();
        let report = run(&config).unwrap();
        let totals = report.totals();

        assert_eq!(totals.total(), OPS_PER_THREAD);
        assert_eq!(totals.inserted - totals.removed, report.map.len());
        assert_eq!(report.teardown(), totals.inserted - totals.removed);
    }
}
