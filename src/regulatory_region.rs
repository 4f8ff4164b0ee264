//! Regulatory region records: enhancers, promoters, binding sites, and
//! their supporting evidence.

use std::io::{Read, Write};

use crate::biotype::BioType;
use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;

const HAS_ECO_ID: u8 = 0x1;
const HAS_PUBMED_IDS: u8 = 0x2;
const HAS_NOTE: u8 = 0x4;

/// A cached regulatory region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegulatoryRegion {
    pub start: i32,
    pub end: i32,
    pub id: String,
    pub biotype: BioType,
    pub note: Option<String>,
    pub pubmed_ids: Option<Vec<i32>>,
    pub eco_id: Option<i32>,
}

impl RegulatoryRegion {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_opt_i32(self.start)?;
        writer.write_opt_i32(self.end)?;
        writer.write_string(&self.id)?;
        writer.write_u8(self.biotype.to_byte())?;

        let pubmed_ids = self.pubmed_ids.as_ref().filter(|ids| !ids.is_empty());
        let mut flags = 0u8;
        if self.eco_id.is_some() {
            flags |= HAS_ECO_ID;
        }
        if pubmed_ids.is_some() {
            flags |= HAS_PUBMED_IDS;
        }
        if self.note.is_some() {
            flags |= HAS_NOTE;
        }
        writer.write_u8(flags)?;

        if let Some(eco_id) = self.eco_id {
            writer.write_opt_i32(eco_id)?;
        }
        if let Some(pubmed_ids) = pubmed_ids {
            writer.write_count(pubmed_ids.len())?;
            for pubmed_id in pubmed_ids {
                writer.write_opt_i32(*pubmed_id)?;
            }
        }
        if let Some(ref note) = self.note {
            writer.write_string(note)?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let start = reader.read_opt_i32()?;
        let end = reader.read_opt_i32()?;
        let id = reader.read_string()?;
        let biotype = BioType::try_from(reader.read_u8()?)?;

        let flags = reader.read_u8()?;

        let eco_id = if flags & HAS_ECO_ID != 0 {
            Some(reader.read_opt_i32()?)
        } else {
            None
        };
        let pubmed_ids = if flags & HAS_PUBMED_IDS != 0 {
            let num_ids = reader.read_opt_i32()?;
            if num_ids < 0 {
                return Err(Error::Corrupt(format!("negative PubMed id count: {num_ids}")));
            }
            let mut ids = Vec::with_capacity(num_ids as usize);
            for _ in 0..num_ids {
                ids.push(reader.read_opt_i32()?);
            }
            Some(ids)
        } else {
            None
        };
        let note = if flags & HAS_NOTE != 0 {
            Some(reader.read_string()?)
        } else {
            None
        };

        Ok(RegulatoryRegion {
            start,
            end,
            id,
            biotype,
            note,
            pubmed_ids,
            eco_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(region: &RegulatoryRegion) -> RegulatoryRegion {
        let mut buf = Vec::new();
        region.write(&mut buf).unwrap();
        RegulatoryRegion::read(&mut buf.as_slice()).unwrap()
    }

    #[test]
    fn all_presence_combinations() {
        for mask in 0u8..8 {
            let region = RegulatoryRegion {
                start: 1_000_000,
                end: 1_000_600,
                id: "ENSR00000344264".to_string(),
                biotype: BioType::Enhancer,
                note: (mask & 1 != 0).then(|| "validated enhancer".to_string()),
                pubmed_ids: (mask & 2 != 0).then(|| vec![13_054_692, 26_744_832]),
                eco_id: (mask & 4 != 0).then_some(705),
            };
            assert_eq!(round_trip(&region), region, "failed for mask {mask}");
        }
    }

    #[test]
    fn flag_byte_layout() {
        let region = RegulatoryRegion {
            start: 5,
            end: 10,
            id: "R1".to_string(),
            biotype: BioType::Promoter,
            note: Some("n".to_string()),
            pubmed_ids: None,
            eco_id: Some(1),
        };

        let mut buf = Vec::new();
        region.write(&mut buf).unwrap();

        let mut r = buf.as_slice();
        r.read_opt_i32().unwrap();
        r.read_opt_i32().unwrap();
        r.read_string().unwrap();
        assert_eq!(r.read_u8().unwrap(), BioType::Promoter.to_byte());
        // eco id | note, no pubmed ids
        assert_eq!(r.read_u8().unwrap(), 0b101);
    }

    #[test]
    fn empty_pubmed_array_decodes_as_absent() {
        let region = RegulatoryRegion {
            start: 5,
            end: 10,
            id: "R1".to_string(),
            biotype: BioType::TfBindingSite,
            note: None,
            pubmed_ids: Some(Vec::new()),
            eco_id: None,
        };

        assert_eq!(round_trip(&region).pubmed_ids, None);
    }
}
