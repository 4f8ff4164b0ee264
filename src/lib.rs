//! Cella: compressed, randomly-accessible transcript annotation cache.

pub mod error;

pub mod biotype;
pub mod cache_bin;
pub mod chromosome;
pub mod cli;
pub mod codec;
pub mod coding_region;
pub mod common_header;
pub mod gene;
pub mod index;
pub mod interval;
pub mod pools;
pub mod query;
pub mod reader;
pub mod reference_cache;
pub mod regulatory_region;
pub mod transcript;
pub mod transcript_region;
pub mod version;
pub mod writer;
