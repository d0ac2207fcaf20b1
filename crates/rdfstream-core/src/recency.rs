/// Intrusive LRU order over slots `1..=capacity`.
///
/// Doubly linked through two index arrays; slot `0` is the sentinel, so
/// `next[0]` is the least recently used slot and `prev[0]` the most recent.
#[derive(Debug, Clone)]
pub(crate) struct RecencyList {
    prev: Vec<usize>,
    next: Vec<usize>,
}

impl RecencyList {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            prev: vec![0; capacity + 1],
            next: vec![0; capacity + 1],
        }
    }

    /// Least recently used slot, or `0` when the list is empty.
    pub(crate) fn lru(&self) -> usize {
        self.next[0]
    }

    /// Link a slot that is not currently in the list as most recently used.
    pub(crate) fn push_back(&mut self, slot: usize) {
        let tail = self.prev[0];
        self.next[tail] = slot;
        self.prev[slot] = tail;
        self.next[slot] = 0;
        self.prev[0] = slot;
    }

    pub(crate) fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.prev[slot], self.next[slot]);
        self.next[prev] = next;
        self.prev[next] = prev;
    }

    /// Mark a linked slot as most recently used.
    pub(crate) fn touch(&mut self, slot: usize) {
        if self.prev[0] == slot {
            return;
        }
        self.unlink(slot);
        self.push_back(slot);
    }
}
