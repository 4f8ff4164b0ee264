//! Binary codec extension traits for reading and writing little-endian
//! primitives, variable-length integers, and length-prefixed strings.
//!
//! The variable-length ("opt") encoding zig-zags signed values so that small
//! magnitudes of either sign stay small, then emits 7 bits per byte with a
//! continuation bit on all but the final byte. Nearly every field in every
//! cache entity passes through these routines.

use std::io::{Read, Write};

use crate::error::Error;

/// Maximum encoded length of a 32-bit opt-int.
const MAX_OPT_I32_BYTES: u32 = 5;

/// Maximum encoded length of a 64-bit opt-int.
const MAX_OPT_U64_BYTES: u32 = 10;

#[inline]
fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[inline]
fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Extension trait for writing little-endian binary values.
pub trait BinaryWrite: Write {
    fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write_all(&[value])?;
        Ok(())
    }

    fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_all(&[u8::from(value)])?;
        Ok(())
    }

    /// Writes a zig-zag 7-bit variable-length signed integer (1-5 bytes).
    fn write_opt_i32(&mut self, value: i32) -> Result<(), Error> {
        let mut remaining = zigzag_encode(value);
        loop {
            let byte = (remaining & 0x7F) as u8;
            remaining >>= 7;
            if remaining == 0 {
                self.write_all(&[byte])?;
                return Ok(());
            }
            self.write_all(&[byte | 0x80])?;
        }
    }

    /// Writes a 7-bit variable-length unsigned integer (1-10 bytes).
    fn write_opt_u64(&mut self, value: u64) -> Result<(), Error> {
        let mut remaining = value;
        loop {
            let byte = (remaining & 0x7F) as u8;
            remaining >>= 7;
            if remaining == 0 {
                self.write_all(&[byte])?;
                return Ok(());
            }
            self.write_all(&[byte | 0x80])?;
        }
    }

    /// Writes a collection length as an opt-int count.
    fn write_count(&mut self, len: usize) -> Result<(), Error> {
        let count = i32::try_from(len)
            .map_err(|_| Error::Validation(format!("count exceeds i32::MAX: {len}")))?;
        self.write_opt_i32(count)
    }

    /// Writes a UTF-8 string as an opt-int byte count followed by the bytes.
    fn write_string(&mut self, s: &str) -> Result<(), Error> {
        self.write_count(s.len())?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Extension trait for reading little-endian binary values.
///
/// Implemented for any `Read`, including `&[u8]`, so block payloads decode
/// with the same routines the outer file reader uses. Running out of bytes
/// mid-value means the entity is truncated, so it surfaces as
/// `Error::Corrupt` rather than `Error::Io`.
pub trait BinaryRead: Read {
    /// Reads exactly `buf.len()` bytes, treating a premature end of stream
    /// as corrupt data.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::Corrupt(format!("truncated data: {} more bytes expected", buf.len()))
            }
            _ => Error::Io(e),
        })
    }

    fn read_u8(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a zig-zag 7-bit variable-length signed integer.
    ///
    /// More than 5 continuation bytes means the stream is corrupt, never a
    /// silently wrapped value.
    fn read_opt_i32(&mut self) -> Result<i32, Error> {
        let mut value: u32 = 0;
        for shift in 0..MAX_OPT_I32_BYTES {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(zigzag_decode(value));
            }
        }
        Err(Error::Corrupt(
            "malformed 7-bit encoded integer: too many continuation bytes".into(),
        ))
    }

    /// Reads a 7-bit variable-length unsigned integer.
    fn read_opt_u64(&mut self) -> Result<u64, Error> {
        let mut value: u64 = 0;
        for shift in 0..MAX_OPT_U64_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::Corrupt(
            "malformed 7-bit encoded long: too many continuation bytes".into(),
        ))
    }

    /// Reads an opt-int length-prefixed UTF-8 string. A zero count decodes
    /// to the empty string.
    fn read_string(&mut self) -> Result<String, Error> {
        let len = self.read_opt_i32()?;
        if len < 0 {
            return Err(Error::Corrupt(format!("negative string length: {len}")));
        }
        if len == 0 {
            return Ok(String::new());
        }
        let mut buf = vec![0u8; len as usize];
        self.read_bytes(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Corrupt(format!("invalid UTF-8: {e}")))
    }
}

impl<W: Write + ?Sized> BinaryWrite for W {}
impl<R: Read + ?Sized> BinaryRead for R {}
