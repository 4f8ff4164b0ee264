//! BioType enum for the transcript and regulatory feature types the cache
//! stores. Encoded as a single byte (8 bits of the transcript flag word).

use std::fmt;

use crate::error::Error;

/// Biological feature types appearing in cached transcripts and regulatory
/// regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BioType {
    AberrantProcessedTranscript = 0,
    AntisenseRna = 1,
    CGeneSegment = 2,
    CtcfBindingSite = 3,
    DGeneSegment = 4,
    DnaseIHypersensitiveSite = 5,
    Enhancer = 6,
    EnhancerBlockingElement = 7,
    EpigeneticallyModifiedRegion = 8,
    GuideRna = 9,
    ImprintingControlRegion = 10,
    Insulator = 11,
    JGeneSegment = 12,
    LincRna = 13,
    LncRna = 14,
    LocusControlRegion = 15,
    MatrixAttachmentSite = 16,
    MiRna = 17,
    MRna = 18,
    NcRna = 19,
    NcPrimaryTranscript = 20,
    NmdTranscriptVariant = 21,
    OpenChromatinRegion = 22,
    PrimaryTranscript = 23,
    ProcessedTranscript = 24,
    Promoter = 25,
    PromoterFlankingRegion = 26,
    PseudogenicTranscript = 27,
    RegulatoryRegion = 28,
    ReplicationRegulatoryRegion = 29,
    ResponseElement = 30,
    Rna = 31,
    RnaseMrpRna = 32,
    RnasePRna = 33,
    RRna = 34,
    ScaRna = 35,
    ScRna = 36,
    Silencer = 37,
    SnoRna = 38,
    SnRna = 39,
    TataBox = 40,
    TelomeraseRna = 41,
    TfBindingSite = 42,
    Transcript = 43,
    TranscriptionalCisRegulatoryRegion = 44,
    TRna = 45,
    UnconfirmedTranscript = 46,
    VaultRna = 47,
    VdGeneSegment = 48,
    VGeneSegment = 49,
    YRna = 50,
}

impl BioType {
    #[must_use]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// All variants in discriminant order, enabling safe u8 → BioType conversion.
const ALL_BIOTYPES: [BioType; 51] = [
    BioType::AberrantProcessedTranscript,
    BioType::AntisenseRna,
    BioType::CGeneSegment,
    BioType::CtcfBindingSite,
    BioType::DGeneSegment,
    BioType::DnaseIHypersensitiveSite,
    BioType::Enhancer,
    BioType::EnhancerBlockingElement,
    BioType::EpigeneticallyModifiedRegion,
    BioType::GuideRna,
    BioType::ImprintingControlRegion,
    BioType::Insulator,
    BioType::JGeneSegment,
    BioType::LincRna,
    BioType::LncRna,
    BioType::LocusControlRegion,
    BioType::MatrixAttachmentSite,
    BioType::MiRna,
    BioType::MRna,
    BioType::NcRna,
    BioType::NcPrimaryTranscript,
    BioType::NmdTranscriptVariant,
    BioType::OpenChromatinRegion,
    BioType::PrimaryTranscript,
    BioType::ProcessedTranscript,
    BioType::Promoter,
    BioType::PromoterFlankingRegion,
    BioType::PseudogenicTranscript,
    BioType::RegulatoryRegion,
    BioType::ReplicationRegulatoryRegion,
    BioType::ResponseElement,
    BioType::Rna,
    BioType::RnaseMrpRna,
    BioType::RnasePRna,
    BioType::RRna,
    BioType::ScaRna,
    BioType::ScRna,
    BioType::Silencer,
    BioType::SnoRna,
    BioType::SnRna,
    BioType::TataBox,
    BioType::TelomeraseRna,
    BioType::TfBindingSite,
    BioType::Transcript,
    BioType::TranscriptionalCisRegulatoryRegion,
    BioType::TRna,
    BioType::UnconfirmedTranscript,
    BioType::VaultRna,
    BioType::VdGeneSegment,
    BioType::VGeneSegment,
    BioType::YRna,
];

impl TryFrom<u8> for BioType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_BIOTYPES
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::Corrupt(format!("invalid biotype byte: {value}")))
    }
}

impl std::str::FromStr for BioType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aberrant_processed_transcript" => Ok(Self::AberrantProcessedTranscript),
            "antisense_RNA" => Ok(Self::AntisenseRna),
            "CTCF_binding_site" => Ok(Self::CtcfBindingSite),
            "C_gene_segment" => Ok(Self::CGeneSegment),
            "DNaseI_hypersensitive_site" | "DNAseI_hypersensitive_site" => {
                Ok(Self::DnaseIHypersensitiveSite)
            }
            "D_gene_segment" => Ok(Self::DGeneSegment),
            "enhancer" => Ok(Self::Enhancer),
            "enhancer_blocking_element" => Ok(Self::EnhancerBlockingElement),
            "epigenetically_modified_region" => Ok(Self::EpigeneticallyModifiedRegion),
            "guide_RNA" => Ok(Self::GuideRna),
            "imprinting_control_region" => Ok(Self::ImprintingControlRegion),
            "insulator" => Ok(Self::Insulator),
            "J_gene_segment" => Ok(Self::JGeneSegment),
            "lincRNA" => Ok(Self::LincRna),
            "lncRNA" => Ok(Self::LncRna),
            "locus_control_region" => Ok(Self::LocusControlRegion),
            "matrix_attachment_site" => Ok(Self::MatrixAttachmentSite),
            "miRNA" => Ok(Self::MiRna),
            "mRNA" => Ok(Self::MRna),
            "ncRNA" => Ok(Self::NcRna),
            "nc_primary_transcript" => Ok(Self::NcPrimaryTranscript),
            "NMD_transcript_variant" => Ok(Self::NmdTranscriptVariant),
            "open_chromatin_region" => Ok(Self::OpenChromatinRegion),
            "primary_transcript" => Ok(Self::PrimaryTranscript),
            "processed_transcript" => Ok(Self::ProcessedTranscript),
            "promoter" => Ok(Self::Promoter),
            "promoter_flanking_region" => Ok(Self::PromoterFlankingRegion),
            "pseudogenic_transcript" => Ok(Self::PseudogenicTranscript),
            "regulatory_region" => Ok(Self::RegulatoryRegion),
            "replication_regulatory_region" => Ok(Self::ReplicationRegulatoryRegion),
            "response_element" => Ok(Self::ResponseElement),
            "RNA" => Ok(Self::Rna),
            "RNase_MRP_RNA" => Ok(Self::RnaseMrpRna),
            "RNase_P_RNA" => Ok(Self::RnasePRna),
            "rRNA" => Ok(Self::RRna),
            "scaRNA" => Ok(Self::ScaRna),
            "scRNA" => Ok(Self::ScRna),
            "silencer" => Ok(Self::Silencer),
            "snoRNA" => Ok(Self::SnoRna),
            "snRNA" => Ok(Self::SnRna),
            "TATA_box" => Ok(Self::TataBox),
            "telomerase_RNA" => Ok(Self::TelomeraseRna),
            "TF_binding_site" => Ok(Self::TfBindingSite),
            "transcript" => Ok(Self::Transcript),
            "transcriptional_cis_regulatory_region" => {
                Ok(Self::TranscriptionalCisRegulatoryRegion)
            }
            "tRNA" => Ok(Self::TRna),
            "unconfirmed_transcript" => Ok(Self::UnconfirmedTranscript),
            "vault_RNA" => Ok(Self::VaultRna),
            "VD_gene_segment" => Ok(Self::VdGeneSegment),
            "V_gene_segment" => Ok(Self::VGeneSegment),
            "Y_RNA" => Ok(Self::YRna),
            _ => Err(Error::Validation(format!("unknown biotype: {s}"))),
        }
    }
}

impl fmt::Display for BioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AberrantProcessedTranscript => "aberrant_processed_transcript",
            Self::AntisenseRna => "antisense_RNA",
            Self::CGeneSegment => "C_gene_segment",
            Self::CtcfBindingSite => "CTCF_binding_site",
            Self::DGeneSegment => "D_gene_segment",
            Self::DnaseIHypersensitiveSite => "DNaseI_hypersensitive_site",
            Self::Enhancer => "enhancer",
            Self::EnhancerBlockingElement => "enhancer_blocking_element",
            Self::EpigeneticallyModifiedRegion => "epigenetically_modified_region",
            Self::GuideRna => "guide_RNA",
            Self::ImprintingControlRegion => "imprinting_control_region",
            Self::Insulator => "insulator",
            Self::JGeneSegment => "J_gene_segment",
            Self::LincRna => "lincRNA",
            Self::LncRna => "lncRNA",
            Self::LocusControlRegion => "locus_control_region",
            Self::MatrixAttachmentSite => "matrix_attachment_site",
            Self::MiRna => "miRNA",
            Self::MRna => "mRNA",
            Self::NcRna => "ncRNA",
            Self::NcPrimaryTranscript => "nc_primary_transcript",
            Self::NmdTranscriptVariant => "NMD_transcript_variant",
            Self::OpenChromatinRegion => "open_chromatin_region",
            Self::PrimaryTranscript => "primary_transcript",
            Self::ProcessedTranscript => "processed_transcript",
            Self::Promoter => "promoter",
            Self::PromoterFlankingRegion => "promoter_flanking_region",
            Self::PseudogenicTranscript => "pseudogenic_transcript",
            Self::RegulatoryRegion => "regulatory_region",
            Self::ReplicationRegulatoryRegion => "replication_regulatory_region",
            Self::ResponseElement => "response_element",
            Self::Rna => "RNA",
            Self::RnaseMrpRna => "RNase_MRP_RNA",
            Self::RnasePRna => "RNase_P_RNA",
            Self::RRna => "rRNA",
            Self::ScaRna => "scaRNA",
            Self::ScRna => "scRNA",
            Self::Silencer => "silencer",
            Self::SnoRna => "snoRNA",
            Self::SnRna => "snRNA",
            Self::TataBox => "TATA_box",
            Self::TelomeraseRna => "telomerase_RNA",
            Self::TfBindingSite => "TF_binding_site",
            Self::Transcript => "transcript",
            Self::TranscriptionalCisRegulatoryRegion => "transcriptional_cis_regulatory_region",
            Self::TRna => "tRNA",
            Self::UnconfirmedTranscript => "unconfirmed_transcript",
            Self::VaultRna => "vault_RNA",
            Self::VdGeneSegment => "VD_gene_segment",
            Self::VGeneSegment => "V_gene_segment",
            Self::YRna => "Y_RNA",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip_all() {
        for byte in 0..=50u8 {
            let bt = BioType::try_from(byte).unwrap();
            assert_eq!(bt.to_byte(), byte);
        }
    }

    #[test]
    fn invalid_byte() {
        assert!(BioType::try_from(51).is_err());
        assert!(BioType::try_from(255).is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(BioType::MRna.to_string(), "mRNA");
        assert_eq!(BioType::Enhancer.to_string(), "enhancer");
        assert_eq!(BioType::YRna.to_string(), "Y_RNA");
    }

    #[test]
    fn name_round_trip_all() {
        for byte in 0..=50u8 {
            let bt = BioType::try_from(byte).unwrap();
            assert_eq!(bt.to_string().parse::<BioType>().unwrap(), bt);
        }
    }

    #[test]
    fn parse_alternate_spelling() {
        assert_eq!(
            "DNAseI_hypersensitive_site".parse::<BioType>().unwrap(),
            BioType::DnaseIHypersensitiveSite
        );
    }

    #[test]
    fn parse_unknown_name() {
        assert!("no_such_biotype".parse::<BioType>().is_err());
    }
}
