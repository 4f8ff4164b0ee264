//! Transcript regions (exons and introns) mapping genomic to cDNA
//! coordinates, with optional CIGAR alignment detail.

use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;

const REGION_TYPE_MASK: u8 = 0x3;
const HAS_CIGAR_OPS: u8 = 0x4;

/// Type of a transcript region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TranscriptRegionType {
    Exon = 0,
    Intron = 1,
}

impl TryFrom<u8> for TranscriptRegionType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Exon),
            1 => Ok(Self::Intron),
            _ => Err(Error::Corrupt(format!("invalid region type: {value}"))),
        }
    }
}

/// CIGAR operation type for regions whose genomic/cDNA alignment is not a
/// pure 1:1 match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CigarOpType {
    Match = 0,
    Insertion = 1,
    Deletion = 2,
}

impl TryFrom<u8> for CigarOpType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Match),
            1 => Ok(Self::Insertion),
            2 => Ok(Self::Deletion),
            _ => Err(Error::Corrupt(format!("invalid CIGAR op type: {value}"))),
        }
    }
}

/// A single CIGAR operation with type and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CigarOp {
    pub op_type: CigarOpType,
    pub length: i32,
}

impl CigarOp {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u8(self.op_type as u8)?;
        writer.write_opt_i32(self.length)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let op_type = CigarOpType::try_from(reader.read_u8()?)?;
        let length = reader.read_opt_i32()?;
        Ok(CigarOp { op_type, length })
    }
}

/// A region within a transcript (exon or intron). Regions are pool entries
/// shared across the transcripts of one cache bin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptRegion {
    pub region_type: TranscriptRegionType,
    pub id: u16,
    pub start: i32,
    pub end: i32,
    pub cdna_start: i32,
    pub cdna_end: i32,
    pub cigar_ops: Option<Vec<CigarOp>>,
}

impl TranscriptRegion {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_opt_i32(self.start)?;
        writer.write_opt_i32(self.end)?;
        writer.write_opt_i32(self.cdna_start)?;
        writer.write_opt_i32(self.cdna_end)?;
        writer.write_u16(self.id)?;

        let cigar_ops = self.cigar_ops.as_ref().filter(|ops| !ops.is_empty());
        let mut flags = self.region_type as u8;
        if cigar_ops.is_some() {
            flags |= HAS_CIGAR_OPS;
        }
        writer.write_u8(flags)?;

        if let Some(cigar_ops) = cigar_ops {
            writer.write_opt_i32(cigar_ops.len() as i32)?;
            for op in cigar_ops {
                op.write(writer)?;
            }
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let start = reader.read_opt_i32()?;
        let end = reader.read_opt_i32()?;
        let cdna_start = reader.read_opt_i32()?;
        let cdna_end = reader.read_opt_i32()?;
        let id = reader.read_u16()?;

        let flags = reader.read_u8()?;
        let region_type = TranscriptRegionType::try_from(flags & REGION_TYPE_MASK)?;

        let cigar_ops = if flags & HAS_CIGAR_OPS != 0 {
            let num_ops = reader.read_opt_i32()?;
            if num_ops < 0 {
                return Err(Error::Corrupt(format!("negative CIGAR op count: {num_ops}")));
            }
            let mut ops = Vec::with_capacity(num_ops as usize);
            for _ in 0..num_ops {
                ops.push(CigarOp::read(reader)?);
            }
            Some(ops)
        } else {
            None
        };

        Ok(TranscriptRegion {
            region_type,
            id,
            start,
            end,
            cdna_start,
            cdna_end,
            cigar_ops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(region: &TranscriptRegion) -> TranscriptRegion {
        let mut buf = Vec::new();
        region.write(&mut buf).unwrap();
        TranscriptRegion::read(&mut buf.as_slice()).unwrap()
    }

    fn exon() -> TranscriptRegion {
        TranscriptRegion {
            region_type: TranscriptRegionType::Exon,
            id: 3,
            start: 7_661_779,
            end: 7_662_111,
            cdna_start: 202,
            cdna_end: 534,
            cigar_ops: None,
        }
    }

    #[test]
    fn round_trip_without_cigar() {
        let region = exon();
        assert_eq!(round_trip(&region), region);
    }

    #[test]
    fn round_trip_intron_with_cigar() {
        let region = TranscriptRegion {
            region_type: TranscriptRegionType::Intron,
            id: 7,
            start: 100,
            end: 220,
            cdna_start: 50,
            cdna_end: 169,
            cigar_ops: Some(vec![
                CigarOp {
                    op_type: CigarOpType::Match,
                    length: 100,
                },
                CigarOp {
                    op_type: CigarOpType::Deletion,
                    length: 1,
                },
                CigarOp {
                    op_type: CigarOpType::Match,
                    length: 20,
                },
            ]),
        };
        assert_eq!(round_trip(&region), region);
    }

    #[test]
    fn empty_cigar_array_decodes_as_absent() {
        let mut region = exon();
        region.cigar_ops = Some(Vec::new());

        let decoded = round_trip(&region);
        assert_eq!(decoded.cigar_ops, None);
    }

    #[test]
    fn flag_byte_layout() {
        let mut region = exon();
        region.region_type = TranscriptRegionType::Intron;
        region.cigar_ops = Some(vec![CigarOp {
            op_type: CigarOpType::Match,
            length: 5,
        }]);

        let mut buf = Vec::new();
        region.write(&mut buf).unwrap();

        let mut r = buf.as_slice();
        for _ in 0..4 {
            r.read_opt_i32().unwrap();
        }
        r.read_u16().unwrap();
        let flags = r.read_u8().unwrap();
        assert_eq!(flags & 0x3, 1); // intron
        assert_ne!(flags & 0x4, 0); // has cigar ops
    }

    #[test]
    fn invalid_cigar_op_type() {
        let bytes = [9u8, 0u8];
        assert!(matches!(
            CigarOp::read(&mut bytes.as_slice()),
            Err(Error::Corrupt(_))
        ));
    }
}
