//! Chromosome identity as seen by the cache layer.

/// A reference sequence the cache stores annotations for. The cache
/// addresses chromosomes by `ref_index`; the names only matter for display
/// and for callers translating user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    pub ucsc_name: String,
    pub ensembl_name: String,
    pub length: u32,
    pub ref_index: u16,
}

impl Chromosome {
    #[must_use]
    pub fn new(ucsc_name: &str, ensembl_name: &str, length: u32, ref_index: u16) -> Self {
        Chromosome {
            ucsc_name: ucsc_name.to_string(),
            ensembl_name: ensembl_name.to_string(),
            length,
            ref_index,
        }
    }

    /// Returns the preferred display name (UCSC, falling back to Ensembl).
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.ucsc_name.is_empty() {
            &self.ensembl_name
        } else {
            &self.ucsc_name
        }
    }
}
