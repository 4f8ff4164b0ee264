//! Gene records and their binary codec.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;

/// External HGNC id → current gene symbol lookup, supplied by the caller at
/// load time. Stored symbols are overridden when their HGNC id appears here.
pub type HgncMap = HashMap<i32, String>;

const HAS_HGNC_ID: u8 = 0x1;
const ON_REVERSE_STRAND: u8 = 0x2;
const HAS_NCBI_GENE_ID: u8 = 0x4;
const HAS_ENSEMBL_ID: u8 = 0x8;

/// A gene shared by the transcripts of one cache bin. Genes are pool
/// entries: each distinct value is serialized once and referenced by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gene {
    pub ncbi_gene_id: Option<String>,
    pub ensembl_id: Option<String>,
    pub on_reverse_strand: bool,
    pub hgnc_id: Option<i32>,
    pub symbol: String,
}

impl Gene {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_string(&self.symbol)?;

        let mut flags = 0u8;
        if self.hgnc_id.is_some() {
            flags |= HAS_HGNC_ID;
        }
        if self.on_reverse_strand {
            flags |= ON_REVERSE_STRAND;
        }
        if self.ncbi_gene_id.is_some() {
            flags |= HAS_NCBI_GENE_ID;
        }
        if self.ensembl_id.is_some() {
            flags |= HAS_ENSEMBL_ID;
        }
        writer.write_u8(flags)?;

        if let Some(ref ncbi_gene_id) = self.ncbi_gene_id {
            writer.write_string(ncbi_gene_id)?;
        }
        if let Some(ref ensembl_id) = self.ensembl_id {
            writer.write_string(ensembl_id)?;
        }
        if let Some(hgnc_id) = self.hgnc_id {
            writer.write_opt_i32(hgnc_id)?;
        }
        Ok(())
    }

    /// Reads a gene. When the stored HGNC id is present in `hgnc_id_to_symbol`,
    /// the mapped symbol replaces the stored one.
    pub fn read<R: Read>(reader: &mut R, hgnc_id_to_symbol: &HgncMap) -> Result<Self, Error> {
        let mut symbol = reader.read_string()?;
        let flags = reader.read_u8()?;

        let ncbi_gene_id = if flags & HAS_NCBI_GENE_ID != 0 {
            Some(reader.read_string()?)
        } else {
            None
        };
        let ensembl_id = if flags & HAS_ENSEMBL_ID != 0 {
            Some(reader.read_string()?)
        } else {
            None
        };
        let hgnc_id = if flags & HAS_HGNC_ID != 0 {
            Some(reader.read_opt_i32()?)
        } else {
            None
        };

        if let Some(id) = hgnc_id {
            if let Some(current_symbol) = hgnc_id_to_symbol.get(&id) {
                symbol = current_symbol.clone();
            }
        }

        Ok(Gene {
            ncbi_gene_id,
            ensembl_id,
            on_reverse_strand: flags & ON_REVERSE_STRAND != 0,
            hgnc_id,
            symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(gene: &Gene, hgnc: &HgncMap) -> Gene {
        let mut buf = Vec::new();
        gene.write(&mut buf).unwrap();
        Gene::read(&mut buf.as_slice(), hgnc).unwrap()
    }

    #[test]
    fn all_presence_combinations() {
        let hgnc = HgncMap::new();
        for mask in 0u8..16 {
            let gene = Gene {
                ncbi_gene_id: (mask & 1 != 0).then(|| "7157".to_string()),
                ensembl_id: (mask & 2 != 0).then(|| "ENSG00000141510".to_string()),
                on_reverse_strand: mask & 4 != 0,
                hgnc_id: (mask & 8 != 0).then_some(11998),
                symbol: "TP53".to_string(),
            };
            assert_eq!(round_trip(&gene, &hgnc), gene, "failed for mask {mask}");
        }
    }

    #[test]
    fn flag_byte_layout_and_field_order() {
        let gene = Gene {
            ncbi_gene_id: None,
            ensembl_id: Some("ENSG1".to_string()),
            on_reverse_strand: true,
            hgnc_id: Some(97),
            symbol: "ABC".to_string(),
        };

        let mut buf = Vec::new();
        gene.write(&mut buf).unwrap();

        let mut r = buf.as_slice();
        assert_eq!(r.read_string().unwrap(), "ABC");
        // reverse strand | ensembl id | hgnc id
        assert_eq!(r.read_u8().unwrap(), 0b1011);
        // NcbiGeneId is omitted entirely
        assert_eq!(r.read_string().unwrap(), "ENSG1");
        assert_eq!(r.read_opt_i32().unwrap(), 97);
        assert!(r.is_empty());
    }

    #[test]
    fn hgnc_map_overrides_stored_symbol() {
        let gene = Gene {
            ncbi_gene_id: None,
            ensembl_id: Some("ENSG1".to_string()),
            on_reverse_strand: true,
            hgnc_id: Some(97),
            symbol: "ABC".to_string(),
        };

        let mut hgnc = HgncMap::new();
        hgnc.insert(97, "XYZ".to_string());
        assert_eq!(round_trip(&gene, &hgnc).symbol, "XYZ");

        // without the map the stored symbol survives
        assert_eq!(round_trip(&gene, &HgncMap::new()).symbol, "ABC");
    }

    #[test]
    fn hgnc_map_without_matching_id_keeps_symbol() {
        let gene = Gene {
            ncbi_gene_id: None,
            ensembl_id: None,
            on_reverse_strand: false,
            hgnc_id: Some(5),
            symbol: "OLD".to_string(),
        };

        let mut hgnc = HgncMap::new();
        hgnc.insert(6, "NEW".to_string());
        assert_eq!(round_trip(&gene, &hgnc).symbol, "OLD");
    }
}
