//! Deduplication pools: the mechanism that lets many transcripts share
//! genes, transcript regions, and sequences by index.
//!
//! At write time the four pool arrays are serialized first and value→index
//! maps built over them; the transcript and regulatory arrays that follow
//! reference pool entries by those indices. Read time mirrors this: the
//! arrays decode first and references resolve by direct indexing. Pool keys
//! rely on derived structural equality, which in Rust is already elementwise
//! over nested `Vec`s and `Option`s.

use std::collections::HashMap;

use crate::error::Error;
use crate::gene::Gene;
use crate::transcript_region::TranscriptRegion;

/// Value→index maps over a bin's pool arrays, used while serializing the
/// transcript and regulatory arrays. A lookup miss is a writer defect.
pub struct WritePools<'a> {
    genes: HashMap<&'a Gene, i32>,
    transcript_regions: HashMap<&'a TranscriptRegion, i32>,
    cdna_seqs: HashMap<&'a str, i32>,
    protein_seqs: HashMap<&'a str, i32>,
}

fn string_index_map(items: Option<&[String]>) -> HashMap<&str, i32> {
    let mut map = HashMap::new();
    if let Some(items) = items {
        for (index, item) in items.iter().enumerate() {
            map.entry(item.as_str()).or_insert(index as i32);
        }
    }
    map
}

impl<'a> WritePools<'a> {
    #[must_use]
    pub fn new(
        genes: Option<&'a [Gene]>,
        transcript_regions: Option<&'a [TranscriptRegion]>,
        cdna_seqs: Option<&'a [String]>,
        protein_seqs: Option<&'a [String]>,
    ) -> Self {
        let mut gene_map = HashMap::new();
        if let Some(genes) = genes {
            for (index, gene) in genes.iter().enumerate() {
                gene_map.entry(gene).or_insert(index as i32);
            }
        }

        let mut region_map = HashMap::new();
        if let Some(regions) = transcript_regions {
            for (index, region) in regions.iter().enumerate() {
                region_map.entry(region).or_insert(index as i32);
            }
        }

        WritePools {
            genes: gene_map,
            transcript_regions: region_map,
            cdna_seqs: string_index_map(cdna_seqs),
            protein_seqs: string_index_map(protein_seqs),
        }
    }

    pub fn gene_index(&self, gene: &Gene) -> Result<i32, Error> {
        self.genes.get(gene).copied().ok_or_else(|| {
            Error::Logic(format!("gene '{}' is missing from the bin's gene pool", gene.symbol))
        })
    }

    pub fn transcript_region_index(&self, region: &TranscriptRegion) -> Result<i32, Error> {
        self.transcript_regions.get(region).copied().ok_or_else(|| {
            Error::Logic(format!(
                "transcript region {} ({}-{}) is missing from the bin's region pool",
                region.id, region.start, region.end
            ))
        })
    }

    pub fn cdna_seq_index(&self, cdna_seq: &str) -> Result<i32, Error> {
        self.cdna_seqs
            .get(cdna_seq)
            .copied()
            .ok_or_else(|| Error::Logic("cDNA sequence is missing from the bin's pool".into()))
    }

    pub fn protein_seq_index(&self, protein_seq: &str) -> Result<i32, Error> {
        self.protein_seqs
            .get(protein_seq)
            .copied()
            .ok_or_else(|| Error::Logic("protein sequence is missing from the bin's pool".into()))
    }
}

/// The four decoded pool arrays of a bin, with checked index resolution.
/// An out-of-range index means the file was written by a defective writer.
#[derive(Debug, Default)]
pub struct ReadPools {
    pub genes: Vec<Gene>,
    pub transcript_regions: Vec<TranscriptRegion>,
    pub cdna_seqs: Vec<String>,
    pub protein_seqs: Vec<String>,
}

fn resolve<'a, T>(items: &'a [T], index: i32, what: &str) -> Result<&'a T, Error> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or_else(|| {
            Error::Logic(format!(
                "{what} pool index {index} out of range (pool size: {})",
                items.len()
            ))
        })
}

impl ReadPools {
    pub fn gene(&self, index: i32) -> Result<&Gene, Error> {
        resolve(&self.genes, index, "gene")
    }

    pub fn transcript_region(&self, index: i32) -> Result<&TranscriptRegion, Error> {
        resolve(&self.transcript_regions, index, "transcript region")
    }

    pub fn cdna_seq(&self, index: i32) -> Result<&str, Error> {
        resolve(&self.cdna_seqs, index, "cDNA sequence").map(String::as_str)
    }

    pub fn protein_seq(&self, index: i32) -> Result<&str, Error> {
        resolve(&self.protein_seqs, index, "protein sequence").map(String::as_str)
    }
}
