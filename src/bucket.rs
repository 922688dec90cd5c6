/// A single node of a bucket chain.
pub(crate) struct Entry {
    key: i32,
    value: i32,
    next: Option<Box<Entry>>,
}

/// Head of a singly linked chain of entries that share a bucket index.
///
/// Lookups walk the chain from the head; new keys are pushed at the head, so
/// a chain lists its most recently inserted key first.
#[derive(Default)]
pub(crate) struct Bucket {
    head: Option<Box<Entry>>,
}

impl Bucket {
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: i32) -> Option<i32> {
        self.iter().find(|&(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: i32) -> Option<&mut i32> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    /// Link a new entry in front of the current head.
    ///
    /// The caller guarantees `key` is not already present in the chain.
    pub fn push_front(&mut self, key: i32, value: i32) {
        let next = self.head.take();
        self.head = Some(Box::new(Entry { key, value, next }));
    }

    /// Unlink the entry for `key` and return its value.
    pub fn remove(&mut self, key: i32) -> Option<i32> {
        match self.head.as_deref() {
            None => return None,
            Some(first) if first.key == key => {
                let mut removed = self.head.take()?;
                self.head = removed.next.take();
                return Some(removed.value);
            }
            Some(_) => {}
        }

        let mut prev = self.head.as_deref_mut()?;
        loop {
            match prev.next.as_deref() {
                None => return None,
                Some(entry) if entry.key == key => {
                    let mut removed = prev.next.take()?;
                    prev.next = removed.next.take();
                    return Some(removed.value);
                }
                Some(_) => {}
            }
            prev = prev.next.as_deref_mut()?;
        }
    }

    /// Release every entry in the chain, returning how many were released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        let mut cursor = self.head.take();
        while let Some(mut entry) = cursor {
            cursor = entry.next.take();
            released += 1;
        }
        released
    }

    /// Number of entries in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Walk the chain from head to tail.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            cursor: self.head.as_deref(),
        }
    }
}

// Unlinks iteratively; the default recursive drop of `Box<Entry>` would
// recurse once per entry on a long chain.
impl Drop for Bucket {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Borrowing iterator over `(key, value)` pairs of one chain.
pub(crate) struct ChainIter<'a> {
    cursor: Option<&'a Entry>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor?;
        self.cursor = entry.next.as_deref();
        Some((entry.key, entry.value))
    }
}
