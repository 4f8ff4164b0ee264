//! Transcript records: the central cached entity, referencing its gene,
//! regions, and cDNA sequence through the bin's deduplication pools.

use std::io::{Read, Write};

use crate::biotype::BioType;
use crate::codec::{BinaryRead, BinaryWrite};
use crate::coding_region::CodingRegion;
use crate::error::Error;
use crate::gene::Gene;
use crate::pools::{ReadPools, WritePools};
use crate::transcript_region::TranscriptRegion;

const HAS_CODING_REGION: u16 = 0x400;
const IS_CANONICAL: u16 = 0x800;

/// Annotation source of a transcript, packed into two flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Source {
    None = 0,
    RefSeq = 1,
    Ensembl = 2,
    BothRefSeqAndEnsembl = 3,
}

impl TryFrom<u8> for Source {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::RefSeq),
            2 => Ok(Self::Ensembl),
            3 => Ok(Self::BothRefSeqAndEnsembl),
            _ => Err(Error::Corrupt(format!("invalid source value: {value}"))),
        }
    }
}

/// A cached transcript. Gene, region, and sequence values are owned clones
/// resolved from the bin's pools at decode time; on the wire they are plain
/// pool indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transcript {
    pub start: i32,
    pub end: i32,
    pub id: String,
    pub biotype: BioType,
    pub is_canonical: bool,
    pub source: Source,
    pub gene: Gene,
    pub transcript_regions: Vec<TranscriptRegion>,
    pub cdna_seq: String,
    pub coding_region: Option<CodingRegion>,
}

impl Transcript {
    pub fn write<W: Write>(&self, writer: &mut W, pools: &WritePools) -> Result<(), Error> {
        writer.write_opt_i32(self.start)?;
        writer.write_opt_i32(self.end)?;
        writer.write_string(&self.id)?;

        writer.write_opt_i32(pools.gene_index(&self.gene)?)?;

        // +====+====+====+====+====+====+====+====+====+====+====+====+====+
        // |\\\\\\\\\\\\\\\\\\\|Cano|CdRg|  Source |         BioType        |
        // +====+====+====+====+====+====+====+====+====+====+====+====+====+
        let mut flags = u16::from(self.biotype.to_byte());
        flags |= u16::from(self.source as u8) << 8;
        if self.coding_region.is_some() {
            flags |= HAS_CODING_REGION;
        }
        if self.is_canonical {
            flags |= IS_CANONICAL;
        }
        writer.write_u16(flags)?;

        writer.write_count(self.transcript_regions.len())?;
        for region in &self.transcript_regions {
            writer.write_opt_i32(pools.transcript_region_index(region)?)?;
        }

        if let Some(ref coding_region) = self.coding_region {
            coding_region.write(writer, pools)?;
        }

        writer.write_opt_i32(pools.cdna_seq_index(&self.cdna_seq)?)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R, pools: &ReadPools) -> Result<Self, Error> {
        let start = reader.read_opt_i32()?;
        let end = reader.read_opt_i32()?;
        let id = reader.read_string()?;

        let gene = pools.gene(reader.read_opt_i32()?)?.clone();

        let flags = reader.read_u16()?;
        let biotype = BioType::try_from((flags & 0xFF) as u8)?;
        let source = Source::try_from(((flags >> 8) & 0x3) as u8)?;
        let has_coding_region = flags & HAS_CODING_REGION != 0;
        let is_canonical = flags & IS_CANONICAL != 0;

        let num_regions = reader.read_opt_i32()?;
        if num_regions < 0 {
            return Err(Error::Corrupt(format!(
                "negative transcript region count: {num_regions}"
            )));
        }
        let mut transcript_regions = Vec::with_capacity(num_regions as usize);
        for _ in 0..num_regions {
            let index = reader.read_opt_i32()?;
            transcript_regions.push(pools.transcript_region(index)?.clone());
        }

        let coding_region = if has_coding_region {
            Some(CodingRegion::read(reader, pools)?)
        } else {
            None
        };

        let cdna_seq = pools.cdna_seq(reader.read_opt_i32()?)?.to_string();

        Ok(Transcript {
            start,
            end,
            id,
            biotype,
            is_canonical,
            source,
            gene,
            transcript_regions,
            cdna_seq,
            coding_region,
        })
    }
}
