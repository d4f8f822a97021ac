use crate::types::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best: Option<Move>,
}

const DEFAULT_ENTRIES: usize = 1 << 20;

/// Fixed-capacity, one entry per slot, slot = `key % capacity`.
/// Depth-preferred: a store only lands if the slot is empty or its resident
/// was searched no deeper than the incoming entry.
pub struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    used: usize,
}

impl Default for TranspositionTable {
    fn default() -> Self { Self::new(DEFAULT_ENTRIES) }
}

impl TranspositionTable {
    pub fn new(entries: usize) -> Self {
        Self { slots: vec![None; entries.max(1)], used: 0 }
    }

    pub fn with_capacity_mb(mb: usize) -> Self {
        let per_entry = std::mem::size_of::<Option<Entry>>().max(1);
        Self::new(mb.saturating_mul(1024 * 1024) / per_entry)
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    pub fn store(&mut self, key: u64, depth: u32, score: i32, bound: Bound, best: Option<Move>) {
        let idx = self.index(key);
        let slot = &mut self.slots[idx];
        match slot {
            Some(cur) if cur.depth > depth => {}
            _ => {
                if slot.is_none() { self.used += 1; }
                *slot = Some(Entry { key, depth, score, bound, best });
            }
        }
    }

    /// Resident entry for `key`; a slot held by a different key is a miss.
    pub fn lookup(&self, key: u64) -> Option<Entry> {
        self.slots[self.index(key)].filter(|e| e.key == key)
    }

    pub fn capacity(&self) -> usize { self.slots.len() }

    pub fn len(&self) -> usize { self.used }

    pub fn is_empty(&self) -> bool { self.used == 0 }

    /// Occupied slots per mille.
    pub fn hashfull(&self) -> u32 {
        ((self.used as u64 * 1000) / self.slots.len() as u64) as u32
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_fixed() {
        let mut tt = TranspositionTable::new(8);
        for k in 0..64u64 { tt.store(k, (k % 4) as u32, 0, Bound::Exact, None); }
        assert_eq!(tt.capacity(), 8);
        assert!(tt.len() <= 8);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut tt = TranspositionTable::new(0);
        tt.store(5, 1, 7, Bound::Lower, None);
        assert_eq!(tt.lookup(5).map(|e| e.score), Some(7));
    }

    #[test]
    fn clear_empties() {
        let mut tt = TranspositionTable::new(16);
        tt.store(3, 1, 0, Bound::Exact, None);
        assert_eq!(tt.hashfull(), 62);
        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.lookup(3).is_none());
    }
}
