//! Writer for Cella transcript cache files.

use std::io::{Seek, Write};

use rand::Rng;

use crate::cache_bin::CacheBin;
use crate::codec::BinaryWrite;
use crate::common_header::{
    write_common_header, CACHE_FILE_TYPE, CACHE_FORMAT_VERSION, FOOTER_INT, GUARD_INT,
};
use crate::error::Error;
use crate::index::{CacheIndex, CacheIndexBuilder};
use crate::reference_cache::ReferenceCache;
use crate::version::DataSourceVersion;

/// Each bin payload is zstd-compressed at this level.
const COMPRESSION_LEVEL: i32 = 19;

/// Writes a complete Cella cache file in one pass.
pub struct CacheWriter;

impl CacheWriter {
    /// Writes a complete cache file.
    ///
    /// `references` must be ordered by ref_index; `None` marks a chromosome
    /// with no annotated features. The pair id minted from `rng` is stamped
    /// into both the cache and the returned [`CacheIndex`], which records
    /// the offset of every reference section and bin payload.
    pub fn write<W: Write + Seek, R: Rng>(
        writer: &mut W,
        data_source_version: &DataSourceVersion,
        references: &[Option<ReferenceCache>],
        rng: &mut R,
    ) -> Result<CacheIndex, Error> {
        let pair_id: i32 = rng.gen();

        write_common_header(writer, CACHE_FILE_TYPE, CACHE_FORMAT_VERSION)?;
        data_source_version.write(writer)?;
        writer.write_opt_i32(pair_id)?;
        writer.write_u32(GUARD_INT)?;

        writer.write_count(references.len())?;

        let mut index = CacheIndexBuilder::new();
        for (ref_index, reference) in references.iter().enumerate() {
            let ref_index = u16::try_from(ref_index)
                .map_err(|_| Error::Validation("reference index exceeds u16::MAX".into()))?;
            Self::write_reference(writer, ref_index, reference.as_ref(), &mut index)?;
        }

        writer.write_u32(FOOTER_INT)?;
        Ok(index.build(pair_id))
    }

    fn write_reference<W: Write + Seek>(
        writer: &mut W,
        ref_index: u16,
        reference: Option<&ReferenceCache>,
        index: &mut CacheIndexBuilder,
    ) -> Result<(), Error> {
        index.record_base(ref_index, writer.stream_position()?);

        let Some(reference) = reference else {
            writer.write_u8(0)?;
            return Ok(());
        };

        let num_bins = u8::try_from(reference.bins.len()).map_err(|_| {
            Error::Validation(format!(
                "{}: bin count {} exceeds the 255-partition limit",
                reference.chromosome.display_name(),
                reference.bins.len()
            ))
        })?;
        writer.write_u8(num_bins)?;

        for (bin_id, bin) in reference.bins.iter().enumerate() {
            index.record_bin(ref_index, bin_id as u8, writer.stream_position()?);
            Self::write_bin(writer, bin)?;
        }

        Ok(())
    }

    fn write_bin<W: Write>(writer: &mut W, bin: &CacheBin) -> Result<(), Error> {
        let mut payload = Vec::new();
        bin.write(&mut payload)?;
        let compressed = zstd::encode_all(payload.as_slice(), COMPRESSION_LEVEL)?;

        writer.write_count(compressed.len())?;
        writer.write_all(&compressed)?;
        Ok(())
    }
}
