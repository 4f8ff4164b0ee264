//! Data-source version metadata embedded in the cache header.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;

/// Identifies the annotation source a cache was built from. Written right
/// after the common header so consumers can report provenance without
/// decoding any blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceVersion {
    pub name: String,
    pub version: String,
    pub release_date: String,
}

impl DataSourceVersion {
    #[must_use]
    pub fn new(name: &str, version: &str, release_date: &str) -> Self {
        DataSourceVersion {
            name: name.to_string(),
            version: version.to_string(),
            release_date: release_date.to_string(),
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_string(&self.name)?;
        writer.write_string(&self.version)?;
        writer.write_string(&self.release_date)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let name = reader.read_string()?;
        let version = reader.read_string()?;
        let release_date = reader.read_string()?;
        Ok(DataSourceVersion {
            name,
            version,
            release_date,
        })
    }
}
