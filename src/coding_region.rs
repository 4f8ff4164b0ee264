//! Coding region records: CDS placement, protein identity, and the edge
//! cases (amino acid edits, ribosomal frameshifts) that make a transcript's
//! translation differ from a straight read-through.

use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;
use crate::pools::{ReadPools, WritePools};

const HAS_AMINO_ACID_EDITS: u8 = 0x1;
const HAS_SLIP: u8 = 0x2;

/// A non-standard codon override: the expected amino acid at a 1-based
/// protein position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AminoAcidEdit {
    pub position: i32,
    pub amino_acid: u8,
}

impl AminoAcidEdit {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_opt_i32(self.position)?;
        writer.write_u8(self.amino_acid)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let position = reader.read_opt_i32()?;
        let amino_acid = reader.read_u8()?;
        Ok(AminoAcidEdit {
            position,
            amino_acid,
        })
    }
}

/// A ribosomal frameshift: 1-based CDS position and slip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslationalSlip {
    pub position: i32,
    pub length: u8,
}

impl TranslationalSlip {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_opt_i32(self.position)?;
        writer.write_u8(self.length)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let position = reader.read_opt_i32()?;
        let length = reader.read_u8()?;
        Ok(TranslationalSlip { position, length })
    }
}

/// The coding region of a transcript. The protein sequence is stored in the
/// bin's protein pool and referenced by index on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodingRegion {
    pub start: i32,
    pub end: i32,
    pub cdna_start: i32,
    pub cdna_end: i32,
    pub protein_id: String,
    pub protein_seq: String,
    /// Number of cDNA bases to insert when the region starts mid-codon.
    pub cds_padding: u8,
    /// CDS coordinate offset when only part of the coding region aligns to
    /// the genome.
    pub cds_offset: u16,
    pub protein_offset: u16,
    pub amino_acid_edits: Option<Vec<AminoAcidEdit>>,
    pub slip: Option<TranslationalSlip>,
}

impl CodingRegion {
    pub fn write<W: Write>(&self, writer: &mut W, pools: &WritePools) -> Result<(), Error> {
        writer.write_opt_i32(self.start)?;
        writer.write_opt_i32(self.end)?;
        writer.write_opt_i32(self.cdna_start)?;
        writer.write_opt_i32(self.cdna_end)?;

        writer.write_string(&self.protein_id)?;
        writer.write_opt_i32(pools.protein_seq_index(&self.protein_seq)?)?;

        writer.write_u8(self.cds_padding)?;
        writer.write_u16(self.cds_offset)?;
        writer.write_u16(self.protein_offset)?;

        let edits = self
            .amino_acid_edits
            .as_ref()
            .filter(|edits| !edits.is_empty());
        let mut flags = 0u8;
        if edits.is_some() {
            flags |= HAS_AMINO_ACID_EDITS;
        }
        if self.slip.is_some() {
            flags |= HAS_SLIP;
        }
        writer.write_u8(flags)?;

        if let Some(edits) = edits {
            writer.write_count(edits.len())?;
            for edit in edits {
                edit.write(writer)?;
            }
        }
        if let Some(ref slip) = self.slip {
            slip.write(writer)?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R, pools: &ReadPools) -> Result<Self, Error> {
        let start = reader.read_opt_i32()?;
        let end = reader.read_opt_i32()?;
        let cdna_start = reader.read_opt_i32()?;
        let cdna_end = reader.read_opt_i32()?;

        let protein_id = reader.read_string()?;
        let protein_seq = pools.protein_seq(reader.read_opt_i32()?)?.to_string();

        let cds_padding = reader.read_u8()?;
        let cds_offset = reader.read_u16()?;
        let protein_offset = reader.read_u16()?;

        let flags = reader.read_u8()?;

        let amino_acid_edits = if flags & HAS_AMINO_ACID_EDITS != 0 {
            let num_edits = reader.read_opt_i32()?;
            if num_edits < 0 {
                return Err(Error::Corrupt(format!(
                    "negative amino acid edit count: {num_edits}"
                )));
            }
            let mut edits = Vec::with_capacity(num_edits as usize);
            for _ in 0..num_edits {
                edits.push(AminoAcidEdit::read(reader)?);
            }
            Some(edits)
        } else {
            None
        };

        let slip = if flags & HAS_SLIP != 0 {
            Some(TranslationalSlip::read(reader)?)
        } else {
            None
        };

        Ok(CodingRegion {
            start,
            end,
            cdna_start,
            cdna_end,
            protein_id,
            protein_seq,
            cds_padding,
            cds_offset,
            protein_offset,
            amino_acid_edits,
            slip,
        })
    }
}
