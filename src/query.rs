//! Position-range queries over a fully loaded cache.

use crate::cache_bin::bin_for_position;
use crate::reference_cache::ReferenceCache;
use crate::regulatory_region::RegulatoryRegion;
use crate::transcript::Transcript;

/// Every reference section of a cache, ordered by ref_index. Chromosomes
/// without annotated features are `None`.
#[derive(Debug)]
pub struct CacheData {
    pub references: Vec<Option<ReferenceCache>>,
}

impl CacheData {
    /// Appends all transcripts on `ref_index` overlapping `[start, end]` to
    /// `results`. A feature spanning several partitions is reported once per
    /// partition it was stored against, so callers scanning wide ranges see
    /// at most one copy; the carry-back marker widens the scan to partitions
    /// whose features reach into the queried range.
    pub fn query_transcripts(
        &self,
        ref_index: u16,
        start: i32,
        end: i32,
        results: &mut Vec<Transcript>,
    ) {
        let Some(reference) = self.reference(ref_index) else {
            return;
        };

        for bin in query_bins(reference, start, end, |b| b.earliest_transcript_bin) {
            reference.bins[bin].query_transcripts(start, end, results);
        }
    }

    /// Appends all regulatory regions on `ref_index` overlapping
    /// `[start, end]` to `results`.
    pub fn query_regulatory_regions(
        &self,
        ref_index: u16,
        start: i32,
        end: i32,
        results: &mut Vec<RegulatoryRegion>,
    ) {
        let Some(reference) = self.reference(ref_index) else {
            return;
        };

        for bin in query_bins(reference, start, end, |b| b.earliest_regulatory_bin) {
            reference.bins[bin].query_regulatory_regions(start, end, results);
        }
    }

    fn reference(&self, ref_index: u16) -> Option<&ReferenceCache> {
        self.references
            .get(usize::from(ref_index))
            .and_then(Option::as_ref)
    }
}

/// Resolves `[start, end]` to the inclusive range of bin ids to scan. The
/// nominal bins are clamped to the last stored partition and the start bin
/// is then replaced by its carry-back marker.
fn query_bins(
    reference: &ReferenceCache,
    start: i32,
    end: i32,
    marker: impl Fn(&crate::cache_bin::CacheBin) -> u8,
) -> std::ops::RangeInclusive<usize> {
    let Some(last_bin) = reference.bins.len().checked_sub(1) else {
        #[allow(clippy::reversed_empty_ranges)]
        return 1..=0;
    };
    let start_bin = usize::from(bin_for_position(start)).min(last_bin);
    let end_bin = usize::from(bin_for_position(end)).min(last_bin);
    let start_bin = usize::from(marker(&reference.bins[start_bin]));
    start_bin..=end_bin
}
