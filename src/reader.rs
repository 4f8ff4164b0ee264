//! Reader for Cella transcript cache files.

use std::io::{Read, Seek, SeekFrom};

use crate::cache_bin::CacheBin;
use crate::chromosome::Chromosome;
use crate::codec::BinaryRead;
use crate::common_header::{
    check_header, read_common_header, CACHE_FILE_TYPE, CACHE_FORMAT_VERSION, FOOTER_INT,
    GUARD_INT,
};
use crate::error::Error;
use crate::gene::HgncMap;
use crate::query::CacheData;
use crate::reference_cache::ReferenceCache;
use crate::version::DataSourceVersion;

/// Reader for Cella cache files. Opening validates the header; the body can
/// then be consumed eagerly with [`read_all`](CacheReader::read_all) or
/// block-by-block through offsets from a paired
/// [`CacheIndex`](crate::index::CacheIndex).
pub struct CacheReader<R: Read + Seek> {
    reader: R,
    data_source_version: DataSourceVersion,
    pair_id: i32,
}

impl<R: Read + Seek> CacheReader<R> {
    /// Reads and validates the cache header, leaving the reader positioned
    /// at the reference count.
    pub fn new(mut reader: R) -> Result<Self, Error> {
        let (file_type, format_version) = read_common_header(&mut reader)?;
        check_header(
            file_type,
            format_version,
            CACHE_FILE_TYPE,
            CACHE_FORMAT_VERSION,
        )?;

        let data_source_version = DataSourceVersion::read(&mut reader)?;
        let pair_id = reader.read_opt_i32()?;

        let guard = reader.read_u32()?;
        if guard != GUARD_INT {
            return Err(Error::Format(format!(
                "invalid guard value in cache file: {guard:#x}"
            )));
        }

        Ok(CacheReader {
            reader,
            data_source_version,
            pair_id,
        })
    }

    #[must_use]
    pub fn data_source_version(&self) -> &DataSourceVersion {
        &self.data_source_version
    }

    #[must_use]
    pub fn pair_id(&self) -> i32 {
        self.pair_id
    }

    /// Reads every reference section and the trailing footer.
    ///
    /// `chromosomes` must be ordered by ref_index and cover every reference
    /// in the file. Call this directly after [`new`](CacheReader::new).
    pub fn read_all(
        &mut self,
        chromosomes: &[Chromosome],
        hgnc_id_to_symbol: &HgncMap,
    ) -> Result<CacheData, Error> {
        let num_references = self.read_reference_count()?;
        if num_references > chromosomes.len() {
            return Err(Error::Validation(format!(
                "cache has {num_references} references but only {} chromosomes were supplied",
                chromosomes.len()
            )));
        }

        let mut references = Vec::with_capacity(num_references);
        for chromosome in chromosomes.iter().take(num_references) {
            references.push(self.read_next_reference(chromosome, hgnc_id_to_symbol)?);
        }

        self.finish()?;
        Ok(CacheData { references })
    }

    /// Reads the reference count. First step of a sequential body read.
    pub fn read_reference_count(&mut self) -> Result<usize, Error> {
        let num_references = self.reader.read_opt_i32()?;
        if num_references < 0 {
            return Err(Error::Corrupt(format!(
                "negative reference count: {num_references}"
            )));
        }
        Ok(num_references as usize)
    }

    /// Reads the next reference section in file order. Returns `None` when
    /// the chromosome has no annotated features.
    pub fn read_next_reference(
        &mut self,
        chromosome: &Chromosome,
        hgnc_id_to_symbol: &HgncMap,
    ) -> Result<Option<ReferenceCache>, Error> {
        self.read_reference_body(chromosome, hgnc_id_to_symbol)
    }

    /// Validates the trailing footer after the last reference section.
    pub fn finish(&mut self) -> Result<(), Error> {
        let footer = self.reader.read_u32()?;
        if footer != FOOTER_INT {
            return Err(Error::Corrupt(format!(
                "invalid footer in cache file: {footer:#x}"
            )));
        }
        Ok(())
    }

    /// Loads one reference section at `offset` (a
    /// [`CacheIndex::base_offset`](crate::index::CacheIndex::base_offset)).
    /// Returns `None` when the chromosome has no annotated features.
    pub fn read_reference(
        &mut self,
        offset: u64,
        chromosome: &Chromosome,
        hgnc_id_to_symbol: &HgncMap,
    ) -> Result<Option<ReferenceCache>, Error> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.read_reference_body(chromosome, hgnc_id_to_symbol)
    }

    /// Loads a single bin at `offset` (a
    /// [`CacheIndex::bin_offset`](crate::index::CacheIndex::bin_offset)).
    pub fn read_bin_at(
        &mut self,
        offset: u64,
        hgnc_id_to_symbol: &HgncMap,
    ) -> Result<CacheBin, Error> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.read_bin(hgnc_id_to_symbol)
    }

    fn read_reference_body(
        &mut self,
        chromosome: &Chromosome,
        hgnc_id_to_symbol: &HgncMap,
    ) -> Result<Option<ReferenceCache>, Error> {
        let num_bins = self.reader.read_u8()?;
        if num_bins == 0 {
            return Ok(None);
        }

        let mut bins = Vec::with_capacity(usize::from(num_bins));
        for _ in 0..num_bins {
            bins.push(self.read_bin(hgnc_id_to_symbol)?);
        }

        Ok(Some(ReferenceCache {
            chromosome: chromosome.clone(),
            bins,
        }))
    }

    fn read_bin(&mut self, hgnc_id_to_symbol: &HgncMap) -> Result<CacheBin, Error> {
        let compressed_size = self.reader.read_opt_i32()?;
        if compressed_size < 0 {
            return Err(Error::Corrupt(format!(
                "negative compressed bin size: {compressed_size}"
            )));
        }

        let mut compressed = vec![0u8; compressed_size as usize];
        self.reader.read_bytes(&mut compressed)?;
        let payload = zstd::decode_all(compressed.as_slice())?;

        CacheBin::read(&mut payload.as_slice(), hgnc_id_to_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biotype::BioType;
    use crate::cache_bin::BIN_WIDTH;
    use crate::gene::Gene;
    use crate::regulatory_region::RegulatoryRegion;
    use crate::transcript::{Source, Transcript};
    use crate::writer::CacheWriter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn chromosomes() -> Vec<Chromosome> {
        vec![
            Chromosome::new("chr1", "1", 248_956_422, 0),
            Chromosome::new("chr2", "2", 242_193_529, 1),
        ]
    }

    fn transcript(id: &str, start: i32, end: i32, hgnc_id: Option<i32>) -> Transcript {
        Transcript {
            start,
            end,
            id: id.to_string(),
            biotype: BioType::MRna,
            is_canonical: true,
            source: Source::RefSeq,
            gene: Gene {
                ncbi_gene_id: Some("672".to_string()),
                ensembl_id: Some("ENSG00000012048".to_string()),
                on_reverse_strand: true,
                hgnc_id,
                symbol: "BRCA1".to_string(),
            },
            transcript_regions: Vec::new(),
            cdna_seq: "ACGTACGT".to_string(),
            coding_region: None,
        }
    }

    fn regulatory(id: &str, start: i32, end: i32) -> RegulatoryRegion {
        RegulatoryRegion {
            start,
            end,
            id: id.to_string(),
            biotype: BioType::Enhancer,
            note: None,
            pubmed_ids: None,
            eco_id: None,
        }
    }

    fn build_cache() -> (Vec<u8>, crate::index::CacheIndex) {
        let chr2_cache = ReferenceCache::from_features(
            chromosomes()[1].clone(),
            vec![
                transcript("NM_007294.4", 100, 5_000, Some(1100)),
                transcript("NM_000059.4", BIN_WIDTH + 50, BIN_WIDTH + 9_000, None),
            ],
            vec![regulatory("ENSR00000128513", 200, 400)],
        )
        .unwrap()
        .unwrap();

        let version = DataSourceVersion::new("RefSeq", "110", "2022-04-12");
        let mut buf = Cursor::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(42);
        let index =
            CacheWriter::write(&mut buf, &version, &[None, Some(chr2_cache)], &mut rng)
                .unwrap();
        (buf.into_inner(), index)
    }

    #[test]
    fn round_trip_header() {
        let (data, index) = build_cache();
        let reader = CacheReader::new(Cursor::new(data)).unwrap();

        assert_eq!(reader.data_source_version().name, "RefSeq");
        assert_eq!(reader.data_source_version().version, "110");
        assert_eq!(reader.pair_id(), index.pair_id);
    }

    #[test]
    fn round_trip_full_read() {
        let (data, _) = build_cache();
        let mut reader = CacheReader::new(Cursor::new(data)).unwrap();
        let cache = reader.read_all(&chromosomes(), &HashMap::new()).unwrap();

        assert_eq!(cache.references.len(), 2);
        assert!(cache.references[0].is_none());

        let chr2 = cache.references[1].as_ref().unwrap();
        assert_eq!(chr2.chromosome.ucsc_name, "chr2");
        assert_eq!(chr2.bins.len(), 2);
        assert_eq!(chr2.num_transcripts(), 2);
        assert_eq!(chr2.num_regulatory_regions(), 1);
        assert_eq!(
            chr2.bins[0].transcripts.as_ref().unwrap()[0].id,
            "NM_007294.4"
        );
    }

    #[test]
    fn hgnc_map_overrides_symbols_on_read() {
        let (data, _) = build_cache();
        let mut reader = CacheReader::new(Cursor::new(data)).unwrap();
        let hgnc: HgncMap = HashMap::from([(1100, "BRCA1_RENAMED".to_string())]);
        let cache = reader.read_all(&chromosomes(), &hgnc).unwrap();

        let chr2 = cache.references[1].as_ref().unwrap();
        let transcripts = chr2.bins[0].transcripts.as_ref().unwrap();
        assert_eq!(transcripts[0].gene.symbol, "BRCA1_RENAMED");
        // the second transcript has no HGNC id, so its symbol is untouched
        let bin1 = chr2.bins[1].transcripts.as_ref().unwrap();
        assert_eq!(bin1[0].gene.symbol, "BRCA1");
    }

    #[test]
    fn addressed_reads_follow_index_offsets() {
        let (data, index) = build_cache();
        let mut reader = CacheReader::new(Cursor::new(data)).unwrap();
        reader.read_all(&chromosomes(), &HashMap::new()).unwrap();

        index.validate_pair(reader.pair_id()).unwrap();

        let base = index.base_offset(1).unwrap();
        let chr2 = reader
            .read_reference(base, &chromosomes()[1], &HashMap::new())
            .unwrap()
            .unwrap();
        assert_eq!(chr2.bins.len(), 2);

        let bin_offset = index.bin_offset(1, 1).unwrap();
        let bin = reader.read_bin_at(bin_offset, &HashMap::new()).unwrap();
        assert_eq!(bin.num_transcripts(), 1);
        assert_eq!(bin.transcripts.as_ref().unwrap()[0].id, "NM_000059.4");
    }

    #[test]
    fn round_trip_through_files_on_disk() {
        let (data, index) = build_cache();
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("refseq.cache");
        let index_path = dir.path().join("refseq.cache.idx");

        std::fs::write(&cache_path, &data).unwrap();
        let mut index_file = std::fs::File::create(&index_path).unwrap();
        index.write(&mut index_file).unwrap();

        let cache_file = std::fs::File::open(&cache_path).unwrap();
        let mut reader = CacheReader::new(std::io::BufReader::new(cache_file)).unwrap();

        let index_file = std::fs::File::open(&index_path).unwrap();
        let loaded_index =
            crate::index::CacheIndex::read(&mut std::io::BufReader::new(index_file)).unwrap();
        loaded_index.validate_pair(reader.pair_id()).unwrap();

        let cache = reader.read_all(&chromosomes(), &HashMap::new()).unwrap();
        assert_eq!(cache.references[1].as_ref().unwrap().num_transcripts(), 2);
    }

    #[test]
    fn wrong_file_type_is_rejected() {
        let (mut data, _) = build_cache();
        data[8] = 0x07;
        assert!(matches!(
            CacheReader::new(Cursor::new(data)),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn corrupted_guard_is_rejected() {
        let (data, _) = build_cache();
        // the guard sits right after the version strings and pair id varint;
        // find it by scanning for the known value
        let guard = GUARD_INT.to_le_bytes();
        let pos = data
            .windows(4)
            .position(|window| window == guard)
            .unwrap();
        let mut data = data;
        data[pos] ^= 0xFF;

        assert!(matches!(
            CacheReader::new(Cursor::new(data)),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn corrupted_footer_is_rejected() {
        let (mut data, _) = build_cache();
        let len = data.len();
        data[len - 1] ^= 0xFF;

        let mut reader = CacheReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(
            reader.read_all(&chromosomes(), &HashMap::new()),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let (mut data, _) = build_cache();
        data.truncate(data.len() / 2);

        let mut reader = CacheReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(
            reader.read_all(&chromosomes(), &HashMap::new()),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn pair_mismatch_is_a_logic_error() {
        let (data, _) = build_cache();
        let reader = CacheReader::new(Cursor::new(data)).unwrap();

        // an index written in a different session carries a different pair id
        let other_index = crate::index::CacheIndexBuilder::new().build(123);
        assert!(matches!(
            other_index.validate_pair(reader.pair_id()),
            Err(Error::Logic(_))
        ));
    }
}
