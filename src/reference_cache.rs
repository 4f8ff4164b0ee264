//! Per-chromosome ordered bin sets.

use crate::cache_bin::{bin_for_position, CacheBin};
use crate::chromosome::Chromosome;
use crate::error::Error;
use crate::regulatory_region::RegulatoryRegion;
use crate::transcript::Transcript;

/// The ordered spatial bins of one chromosome; the vector index is the
/// partition id. Chromosomes without annotated features have no
/// `ReferenceCache` at all.
#[derive(Debug)]
pub struct ReferenceCache {
    pub chromosome: Chromosome,
    pub bins: Vec<CacheBin>,
}

impl ReferenceCache {
    /// Partitions a chromosome's features into bins, computing each bin's
    /// carry-back markers. Returns `None` when there are no features.
    ///
    /// Every feature lands in the bin of its start position; a bin's marker
    /// is the earliest bin whose features still overlap it, so queries can
    /// reach features spanning in from sparser partitions.
    pub fn from_features(
        chromosome: Chromosome,
        transcripts: Vec<Transcript>,
        regulatory_regions: Vec<RegulatoryRegion>,
    ) -> Result<Option<Self>, Error> {
        if transcripts.is_empty() && regulatory_regions.is_empty() {
            return Ok(None);
        }

        for tx in &transcripts {
            validate_span(&chromosome, tx.start, tx.end, &tx.id)?;
        }
        for region in &regulatory_regions {
            validate_span(&chromosome, region.start, region.end, &region.id)?;
        }

        let last_bin = transcripts
            .iter()
            .map(|tx| bin_for_position(tx.end))
            .chain(
                regulatory_regions
                    .iter()
                    .map(|region| bin_for_position(region.end)),
            )
            .max()
            .unwrap_or(0);
        let num_bins = usize::from(last_bin) + 1;

        let mut binned_transcripts: Vec<Vec<Transcript>> = (0..num_bins).map(|_| Vec::new()).collect();
        let mut binned_regions: Vec<Vec<RegulatoryRegion>> =
            (0..num_bins).map(|_| Vec::new()).collect();
        let mut earliest_transcript: Vec<u8> = (0..num_bins).map(|b| b as u8).collect();
        let mut earliest_regulatory: Vec<u8> = (0..num_bins).map(|b| b as u8).collect();

        for tx in transcripts {
            let start_bin = bin_for_position(tx.start);
            let end_bin = bin_for_position(tx.end);
            for bin in start_bin..=end_bin {
                let slot = &mut earliest_transcript[usize::from(bin)];
                *slot = (*slot).min(start_bin);
            }
            binned_transcripts[usize::from(start_bin)].push(tx);
        }

        for region in regulatory_regions {
            let start_bin = bin_for_position(region.start);
            let end_bin = bin_for_position(region.end);
            for bin in start_bin..=end_bin {
                let slot = &mut earliest_regulatory[usize::from(bin)];
                *slot = (*slot).min(start_bin);
            }
            binned_regions[usize::from(start_bin)].push(region);
        }

        let bins = binned_transcripts
            .into_iter()
            .zip(binned_regions)
            .enumerate()
            .map(|(bin_id, (bin_transcripts, bin_regions))| {
                CacheBin::new(
                    earliest_transcript[bin_id],
                    earliest_regulatory[bin_id],
                    Some(bin_transcripts),
                    Some(bin_regions),
                )
            })
            .collect();

        Ok(Some(ReferenceCache {
            chromosome,
            bins,
        }))
    }

    #[must_use]
    pub fn num_transcripts(&self) -> usize {
        self.bins.iter().map(CacheBin::num_transcripts).sum()
    }

    #[must_use]
    pub fn num_regulatory_regions(&self) -> usize {
        self.bins.iter().map(CacheBin::num_regulatory_regions).sum()
    }
}

fn validate_span(chromosome: &Chromosome, start: i32, end: i32, id: &str) -> Result<(), Error> {
    if start > end {
        return Err(Error::Validation(format!(
            "feature {id} on {} has an inverted span: {start} > {end}",
            chromosome.display_name()
        )));
    }
    Ok(())
}
