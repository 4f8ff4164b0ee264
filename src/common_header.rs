//! Common file header shared across Cella file types.

use std::io::{Read, Write};

use crate::codec::{BinaryRead, BinaryWrite};
use crate::error::Error;

/// Cella file signature: 0x89 0x43 0x45 0x4C 0x0D 0x0A 0x1A 0x0A
pub const CELLA_SIGNATURE: u64 = 727_905_342_004_216_713;

/// File type identifier for transcript cache files.
pub const CACHE_FILE_TYPE: u16 = 2;

/// File type identifier for cache block-offset index files.
pub const CACHE_INDEX_FILE_TYPE: u16 = 3;

/// Current format version for transcript cache files.
pub const CACHE_FORMAT_VERSION: u16 = 1;

/// Current format version for cache index files.
pub const CACHE_INDEX_FORMAT_VERSION: u16 = 1;

/// Guard integer written after the header metadata of both the cache and
/// index files. A mismatch means an incompatible or damaged file.
pub const GUARD_INT: u32 = 0x87C3_E1F0;

/// Footer integer terminating both files, detecting truncated writes.
pub const FOOTER_INT: u32 = 0x3A2B_1C0D;

/// Writes the common header (signature + file type + format version).
pub fn write_common_header<W: Write>(
    writer: &mut W,
    file_type: u16,
    format_version: u16,
) -> Result<(), Error> {
    writer.write_u64(CELLA_SIGNATURE)?;
    writer.write_u16(file_type)?;
    writer.write_u16(format_version)?;
    Ok(())
}

/// Reads and validates the common header. Returns (file_type, format_version).
pub fn read_common_header<R: Read>(reader: &mut R) -> Result<(u16, u16), Error> {
    let signature = reader.read_u64()?;
    if signature != CELLA_SIGNATURE {
        return Err(Error::Format(format!(
            "invalid Cella file signature: expected {CELLA_SIGNATURE}, got {signature}"
        )));
    }

    let file_type = reader.read_u16()?;
    let format_version = reader.read_u16()?;

    Ok((file_type, format_version))
}

/// Validates the expected file type and format version read from a header.
pub fn check_header(
    file_type: u16,
    format_version: u16,
    expected_type: u16,
    expected_version: u16,
) -> Result<(), Error> {
    if file_type != expected_type {
        return Err(Error::Format(format!(
            "unexpected file type: expected {expected_type}, got {file_type}"
        )));
    }
    if format_version != expected_version {
        return Err(Error::Format(format!(
            "unexpected format version: expected {expected_version}, got {format_version}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_byte_layout() {
        let bytes = CELLA_SIGNATURE.to_le_bytes();
        assert_eq!(bytes, [0x89, 0x43, 0x45, 0x4C, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn round_trip() {
        let mut buf = Vec::new();
        write_common_header(&mut buf, CACHE_FILE_TYPE, CACHE_FORMAT_VERSION).unwrap();

        let mut cursor = buf.as_slice();
        let (file_type, format_version) = read_common_header(&mut cursor).unwrap();
        assert_eq!(file_type, CACHE_FILE_TYPE);
        assert_eq!(format_version, CACHE_FORMAT_VERSION);
    }

    #[test]
    fn invalid_signature() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&CACHE_FILE_TYPE.to_le_bytes());
        buf.extend_from_slice(&CACHE_FORMAT_VERSION.to_le_bytes());

        let result = read_common_header(&mut buf.as_slice());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid Cella file signature")
        );
    }

    #[test]
    fn wrong_file_type_rejected() {
        let err = check_header(
            CACHE_INDEX_FILE_TYPE,
            CACHE_FORMAT_VERSION,
            CACHE_FILE_TYPE,
            CACHE_FORMAT_VERSION,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected file type"));
    }

    #[test]
    fn wrong_format_version_rejected() {
        let err = check_header(CACHE_FILE_TYPE, 99, CACHE_FILE_TYPE, CACHE_FORMAT_VERSION)
            .unwrap_err();
        assert!(err.to_string().contains("unexpected format version"));
    }
}
