//! Overlap index seam. `IntervalIndex` hides the generic interval-query
//! structure behind a build/find interface so its internals stay out of the
//! codec core. Indexes are rebuilt in memory on load and never persisted.

use rust_lapper::{Interval, Lapper};

/// An overlap index over the items of one cache bin. Items are identified
/// by their position in the bin's array; genomic coordinates are 1-based
/// inclusive.
pub struct IntervalIndex {
    lapper: Lapper<u32, u32>,
}

impl std::fmt::Debug for IntervalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalIndex")
            .field("len", &self.lapper.len())
            .finish()
    }
}

impl IntervalIndex {
    /// Builds an index from `(start, end, item_index)` triples with
    /// inclusive ends.
    #[must_use]
    pub fn build(spans: impl IntoIterator<Item = (i32, i32, u32)>) -> Self {
        let intervals: Vec<Interval<u32, u32>> = spans
            .into_iter()
            .map(|(start, end, item_index)| {
                let start = start.max(0) as u32;
                let stop = end.max(start as i32) as u32 + 1;
                Interval {
                    start,
                    stop,
                    val: item_index,
                }
            })
            .collect();
        IntervalIndex {
            lapper: Lapper::new(intervals),
        }
    }

    /// Returns the item indices overlapping `[begin, end]`, in item order.
    #[must_use]
    pub fn find(&self, begin: i32, end: i32) -> Vec<u32> {
        if end < begin {
            return Vec::new();
        }
        let start = begin.max(0) as u32;
        let stop = end.max(0) as u32 + 1;

        let mut item_indices: Vec<u32> = self
            .lapper
            .find(start, stop)
            .map(|interval| interval.val)
            .collect();
        item_indices.sort_unstable();
        item_indices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lapper.len() == 0
    }
}
