//! Spatial cache bins: one genomic partition's worth of entities, with
//! carry-back markers and in-memory overlap indexes.
//!
//! A chromosome's coordinate range maps onto at most 256 flat partitions of
//! `BIN_WIDTH` bases. Each bin stores the features that *start* inside it;
//! a feature extending into later bins is found again through those bins'
//! carry-back markers. The bin payload is self-contained: the four pool
//! arrays are written before the transcript and regulatory arrays that
//! reference them by index.

use std::collections::HashSet;
use std::hash::Hash;
use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;
use crate::gene::{Gene, HgncMap};
use crate::interval::IntervalIndex;
use crate::pools::{ReadPools, WritePools};
use crate::regulatory_region::RegulatoryRegion;
use crate::transcript::Transcript;
use crate::transcript_region::TranscriptRegion;

/// Width of one genomic partition in bases. Shared by writer and reader;
/// changing it requires rebuilding every store.
pub const BIN_WIDTH: i32 = 4_194_304;

/// Highest valid partition id.
pub const MAX_BIN: u8 = 255;

/// Maps a genomic position to its partition id. Deterministic and monotonic;
/// positions beyond the last partition clamp to `MAX_BIN`.
#[must_use]
pub fn bin_for_position(position: i32) -> u8 {
    let bin = position.max(0) / BIN_WIDTH;
    bin.min(i32::from(MAX_BIN)) as u8
}

/// One genomic partition's entities plus its rebuilt overlap indexes.
#[derive(Debug)]
pub struct CacheBin {
    /// Earliest partition id whose transcripts still overlap this one.
    pub earliest_transcript_bin: u8,
    /// Earliest partition id whose regulatory regions still overlap this one.
    pub earliest_regulatory_bin: u8,
    pub genes: Option<Vec<Gene>>,
    pub transcript_regions: Option<Vec<TranscriptRegion>>,
    pub cdna_seqs: Option<Vec<String>>,
    pub protein_seqs: Option<Vec<String>>,
    pub transcripts: Option<Vec<Transcript>>,
    pub regulatory_regions: Option<Vec<RegulatoryRegion>>,
    transcript_index: IntervalIndex,
    regulatory_index: IntervalIndex,
}

impl PartialEq for CacheBin {
    fn eq(&self, other: &Self) -> bool {
        self.earliest_transcript_bin == other.earliest_transcript_bin
            && self.earliest_regulatory_bin == other.earliest_regulatory_bin
            && self.genes == other.genes
            && self.transcript_regions == other.transcript_regions
            && self.cdna_seqs == other.cdna_seqs
            && self.protein_seqs == other.protein_seqs
            && self.transcripts == other.transcripts
            && self.regulatory_regions == other.regulatory_regions
    }
}

fn collect_unique<T: Clone + Eq + Hash>(items: impl Iterator<Item = T>) -> Option<Vec<T>> {
    let mut seen: HashSet<T> = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            unique.push(item);
        }
    }
    if unique.is_empty() { None } else { Some(unique) }
}

fn build_transcript_index(transcripts: &Option<Vec<Transcript>>) -> IntervalIndex {
    IntervalIndex::build(
        transcripts
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, tx)| (tx.start, tx.end, i as u32)),
    )
}

fn build_regulatory_index(regions: &Option<Vec<RegulatoryRegion>>) -> IntervalIndex {
    IntervalIndex::build(
        regions
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, region)| (region.start, region.end, i as u32)),
    )
}

impl CacheBin {
    /// Builds a bin from its features, deriving the four deduplication pool
    /// arrays (first appearance wins) and the overlap indexes.
    #[must_use]
    pub fn new(
        earliest_transcript_bin: u8,
        earliest_regulatory_bin: u8,
        transcripts: Option<Vec<Transcript>>,
        regulatory_regions: Option<Vec<RegulatoryRegion>>,
    ) -> Self {
        let transcripts = transcripts.filter(|list| !list.is_empty());
        let regulatory_regions = regulatory_regions.filter(|list| !list.is_empty());

        let all = || transcripts.iter().flatten();
        let genes = collect_unique(all().map(|tx| tx.gene.clone()));
        let transcript_regions =
            collect_unique(all().flat_map(|tx| tx.transcript_regions.iter().cloned()));
        let cdna_seqs = collect_unique(all().map(|tx| tx.cdna_seq.clone()));
        let protein_seqs = collect_unique(
            all().filter_map(|tx| tx.coding_region.as_ref().map(|cr| cr.protein_seq.clone())),
        );

        let transcript_index = build_transcript_index(&transcripts);
        let regulatory_index = build_regulatory_index(&regulatory_regions);

        CacheBin {
            earliest_transcript_bin,
            earliest_regulatory_bin,
            genes,
            transcript_regions,
            cdna_seqs,
            protein_seqs,
            transcripts,
            regulatory_regions,
            transcript_index,
            regulatory_index,
        }
    }

    /// Serializes the uncompressed bin payload: markers, the four pool
    /// arrays, then the transcript and regulatory arrays.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u8(self.earliest_transcript_bin)?;
        writer.write_u8(self.earliest_regulatory_bin)?;

        write_items(writer, &self.genes, |w, gene: &Gene| gene.write(w))?;
        write_items(writer, &self.transcript_regions, |w, region: &TranscriptRegion| {
            region.write(w)
        })?;
        write_items(writer, &self.cdna_seqs, |w, seq: &String| w.write_string(seq))?;
        write_items(writer, &self.protein_seqs, |w, seq: &String| {
            w.write_string(seq)
        })?;

        let pools = WritePools::new(
            self.genes.as_deref(),
            self.transcript_regions.as_deref(),
            self.cdna_seqs.as_deref(),
            self.protein_seqs.as_deref(),
        );

        write_items(writer, &self.transcripts, |w, tx: &Transcript| {
            tx.write(w, &pools)
        })?;
        write_items(writer, &self.regulatory_regions, |w, region: &RegulatoryRegion| {
            region.write(w)
        })?;
        Ok(())
    }

    /// Decodes an uncompressed bin payload, resolving pool references and
    /// rebuilding the overlap indexes.
    pub fn read<R: Read>(reader: &mut R, hgnc_id_to_symbol: &HgncMap) -> Result<Self, Error> {
        let earliest_transcript_bin = reader.read_u8()?;
        let earliest_regulatory_bin = reader.read_u8()?;

        let genes = read_items(reader, |r| Gene::read(r, hgnc_id_to_symbol))?;
        let transcript_regions = read_items(reader, TranscriptRegion::read)?;
        let cdna_seqs = read_items(reader, |r| r.read_string())?;
        let protein_seqs = read_items(reader, |r| r.read_string())?;

        let pools = ReadPools {
            genes: genes.clone().unwrap_or_default(),
            transcript_regions: transcript_regions.clone().unwrap_or_default(),
            cdna_seqs: cdna_seqs.clone().unwrap_or_default(),
            protein_seqs: protein_seqs.clone().unwrap_or_default(),
        };

        let transcripts = read_items(reader, |r| Transcript::read(r, &pools))?;
        let regulatory_regions = read_items(reader, RegulatoryRegion::read)?;

        let transcript_index = build_transcript_index(&transcripts);
        let regulatory_index = build_regulatory_index(&regulatory_regions);

        Ok(CacheBin {
            earliest_transcript_bin,
            earliest_regulatory_bin,
            genes,
            transcript_regions,
            cdna_seqs,
            protein_seqs,
            transcripts,
            regulatory_regions,
            transcript_index,
            regulatory_index,
        })
    }

    /// Appends this bin's transcripts overlapping `[start, end]` to `results`.
    pub fn query_transcripts(&self, start: i32, end: i32, results: &mut Vec<Transcript>) {
        if let Some(ref transcripts) = self.transcripts {
            for item_index in self.transcript_index.find(start, end) {
                results.push(transcripts[item_index as usize].clone());
            }
        }
    }

    /// Appends this bin's regulatory regions overlapping `[start, end]` to
    /// `results`.
    pub fn query_regulatory_regions(
        &self,
        start: i32,
        end: i32,
        results: &mut Vec<RegulatoryRegion>,
    ) {
        if let Some(ref regions) = self.regulatory_regions {
            for item_index in self.regulatory_index.find(start, end) {
                results.push(regions[item_index as usize].clone());
            }
        }
    }

    #[must_use]
    pub fn num_transcripts(&self) -> usize {
        self.transcripts.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn num_regulatory_regions(&self) -> usize {
        self.regulatory_regions.as_ref().map_or(0, Vec::len)
    }
}

/// Writes an optional array as a count followed by its entries; `None` and
/// empty both serialize as count 0.
fn write_items<W: Write, T>(
    writer: &mut W,
    items: &Option<Vec<T>>,
    write_item: impl Fn(&mut W, &T) -> Result<(), Error>,
) -> Result<(), Error> {
    match items {
        Some(list) => {
            writer.write_count(list.len())?;
            for item in list {
                write_item(writer, item)?;
            }
        }
        None => writer.write_opt_i32(0)?,
    }
    Ok(())
}

/// Reads a count-prefixed array; a zero count always decodes to `None`.
fn read_items<R: Read, T>(
    reader: &mut R,
    read_item: impl Fn(&mut R) -> Result<T, Error>,
) -> Result<Option<Vec<T>>, Error> {
    let count = reader.read_opt_i32()?;
    if count < 0 {
        return Err(Error::Corrupt(format!("negative array count: {count}")));
    }
    if count == 0 {
        return Ok(None);
    }
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(read_item(reader)?);
    }
    Ok(Some(items))
}
