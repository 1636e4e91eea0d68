use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

///
/// SeenValues
///
/// Execution-scoped set of column codes already emitted.
///
/// Grows with the number of distinct codes observed in one execution and
/// is never evicted; memory is bounded only by column cardinality.
///

#[derive(Debug)]
pub struct SeenValues {
    codes: HashSet<i32, Xxh3Builder>,
}

impl SeenValues {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codes: HashSet::with_hasher(Xxh3Builder::new()),
        }
    }

    /// Record `code`, returning `true` when it was not previously present.
    pub fn insert(&mut self, code: i32) -> bool {
        self.codes.insert(code)
    }

    #[must_use]
    pub fn contains(&self, code: i32) -> bool {
        self.codes.contains(&code)
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for SeenValues {
    fn default() -> Self {
        Self::new()
    }
}
