/// Snapshot-based iterator that captures the current state of the map.
///
/// This iterator collects all entries into a vector first, then iterates over
/// them. This means it won't see concurrent modifications made after the
/// snapshot is taken, but it's guaranteed to see a consistent view of the map
/// at the time of creation. Entries come out in bucket order, and within a
/// bucket in chain order.
#[derive(Debug, Clone)]
pub struct SnapshotIter {
    entries: Vec<(i32, i32)>,
    index: usize,
}

impl SnapshotIter {
    pub(crate) fn new(entries: Vec<(i32, i32)>) -> Self {
        Self { entries, index: 0 }
    }
}

impl Iterator for SnapshotIter {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.entries.get(self.index).copied()?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SnapshotIter {}
