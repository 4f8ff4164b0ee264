//! Block-offset index paired with a cache file for addressed bin loads.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::common_header::{
    check_header, read_common_header, write_common_header, CACHE_INDEX_FILE_TYPE,
    CACHE_INDEX_FORMAT_VERSION, FOOTER_INT, GUARD_INT,
};
use crate::error::Error;

/// Accumulates file offsets while a cache is being written.
#[derive(Debug, Default)]
pub struct CacheIndexBuilder {
    base_offsets: BTreeMap<u16, u64>,
    bin_offsets: BTreeMap<u16, BTreeMap<u8, u64>>,
}

impl CacheIndexBuilder {
    #[must_use]
    pub fn new() -> Self {
        CacheIndexBuilder::default()
    }

    /// Records the offset of a reference's bin-count byte.
    pub fn record_base(&mut self, ref_index: u16, offset: u64) {
        self.base_offsets.insert(ref_index, offset);
    }

    /// Records the offset of one bin's compressed payload.
    pub fn record_bin(&mut self, ref_index: u16, bin: u8, offset: u64) {
        self.bin_offsets
            .entry(ref_index)
            .or_default()
            .insert(bin, offset);
    }

    /// Finalizes the index, keeping only references with at least one
    /// recorded bin.
    #[must_use]
    pub fn build(self, pair_id: i32) -> CacheIndex {
        let CacheIndexBuilder {
            base_offsets,
            bin_offsets,
        } = self;

        let entries = bin_offsets
            .into_iter()
            .filter(|(_, bins)| !bins.is_empty())
            .map(|(ref_index, bins)| IndexEntry {
                ref_index,
                base_offset: base_offsets.get(&ref_index).copied().unwrap_or(0),
                bins: bins.into_iter().collect(),
            })
            .collect();

        CacheIndex { pair_id, entries }
    }
}

/// One indexed reference: where its section starts and where each of its
/// bins starts, sorted by bin id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub ref_index: u16,
    pub base_offset: u64,
    pub bins: Vec<(u8, u64)>,
}

/// The offsets of every bin in a paired cache file. The pair id ties the
/// index to the exact cache file it was written alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheIndex {
    pub pair_id: i32,
    pub entries: Vec<IndexEntry>,
}

impl CacheIndex {
    /// Confirms this index belongs to the cache file carrying `pair_id`.
    pub fn validate_pair(&self, pair_id: i32) -> Result<(), Error> {
        if self.pair_id != pair_id {
            return Err(Error::Logic(format!(
                "cache/index pair mismatch: cache has pair id {pair_id}, index has {}",
                self.pair_id
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn base_offset(&self, ref_index: u16) -> Option<u64> {
        self.entry(ref_index).map(|entry| entry.base_offset)
    }

    #[must_use]
    pub fn bin_offset(&self, ref_index: u16, bin: u8) -> Option<u64> {
        let entry = self.entry(ref_index)?;
        entry
            .bins
            .binary_search_by_key(&bin, |&(id, _)| id)
            .ok()
            .map(|pos| entry.bins[pos].1)
    }

    fn entry(&self, ref_index: u16) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by_key(&ref_index, |entry| entry.ref_index)
            .ok()
            .map(|pos| &self.entries[pos])
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        write_common_header(writer, CACHE_INDEX_FILE_TYPE, CACHE_INDEX_FORMAT_VERSION)?;
        writer.write_opt_i32(self.pair_id)?;
        writer.write_u32(GUARD_INT)?;

        writer.write_count(self.entries.len())?;
        for entry in &self.entries {
            writer.write_u16(entry.ref_index)?;
            writer.write_opt_u64(entry.base_offset)?;
            writer.write_count(entry.bins.len())?;
            for &(bin, offset) in &entry.bins {
                writer.write_u8(bin)?;
                writer.write_opt_u64(offset)?;
            }
        }

        writer.write_u32(FOOTER_INT)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let (file_type, format_version) = read_common_header(reader)?;
        check_header(
            file_type,
            format_version,
            CACHE_INDEX_FILE_TYPE,
            CACHE_INDEX_FORMAT_VERSION,
        )?;

        let pair_id = reader.read_opt_i32()?;
        let guard = reader.read_u32()?;
        if guard != GUARD_INT {
            return Err(Error::Format(format!(
                "invalid guard value in cache index: {guard:#x}"
            )));
        }

        let num_entries = reader.read_opt_i32()?;
        if num_entries < 0 {
            return Err(Error::Corrupt(format!(
                "negative index entry count: {num_entries}"
            )));
        }

        let mut entries = Vec::with_capacity(num_entries as usize);
        for _ in 0..num_entries {
            let ref_index = reader.read_u16()?;
            let base_offset = reader.read_opt_u64()?;
            let num_bins = reader.read_opt_i32()?;
            if num_bins < 0 {
                return Err(Error::Corrupt(format!("negative bin count: {num_bins}")));
            }
            let mut bins = Vec::with_capacity(num_bins as usize);
            for _ in 0..num_bins {
                let bin = reader.read_u8()?;
                let offset = reader.read_opt_u64()?;
                bins.push((bin, offset));
            }
            entries.push(IndexEntry {
                ref_index,
                base_offset,
                bins,
            });
        }

        let footer = reader.read_u32()?;
        if footer != FOOTER_INT {
            return Err(Error::Corrupt(format!(
                "invalid footer in cache index: {footer:#x}"
            )));
        }

        Ok(CacheIndex { pair_id, entries })
    }
}
