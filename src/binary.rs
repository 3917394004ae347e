//! Typed big-endian and little-endian reads/writes over byte slices.
//!
//! These are the atoms the rest of the converter builds on: every header
//! field and schema slot eventually bottoms out in one of these functions.
//! Bounds violations are the only error case, and are reported with the
//! offset and the field name so a caller can locate the bad record.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Byte order an ESM stream is encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

fn check(slice: &[u8], offset: usize, width: usize, what: &'static str) -> Result<()> {
    if offset.checked_add(width).is_none_or(|end| end > slice.len()) {
        return Err(Error::Truncated {
            what,
            offset: offset as u64,
            len: slice.len(),
        });
    }
    Ok(())
}

macro_rules! rw_pair {
    ($ty:ty, $read_method:ident, $write_method:ident, $read_be:ident, $read_le:ident, $write_be:ident, $write_le:ident, $width:expr, $what:expr) => {
        pub fn $read_be(slice: &[u8], offset: usize) -> Result<$ty> {
            check(slice, offset, $width, $what)?;
            Ok(BigEndian::$read_method(&slice[offset..offset + $width]))
        }

        pub fn $read_le(slice: &[u8], offset: usize) -> Result<$ty> {
            check(slice, offset, $width, $what)?;
            Ok(LittleEndian::$read_method(&slice[offset..offset + $width]))
        }

        pub fn $write_be(out: &mut Vec<u8>, value: $ty) {
            let mut buf = [0u8; $width];
            BigEndian::$write_method(&mut buf, value);
            out.extend_from_slice(&buf);
        }

        pub fn $write_le(out: &mut Vec<u8>, value: $ty) {
            let mut buf = [0u8; $width];
            LittleEndian::$write_method(&mut buf, value);
            out.extend_from_slice(&buf);
        }
    };
}

rw_pair!(u16, read_u16, write_u16, read_u16_be, read_u16_le, write_u16_be, write_u16_le, 2, "u16");
rw_pair!(u32, read_u32, write_u32, read_u32_be, read_u32_le, write_u32_be, write_u32_le, 4, "u32");
rw_pair!(u64, read_u64, write_u64, read_u64_be, read_u64_le, write_u64_be, write_u64_le, 8, "u64");
rw_pair!(i16, read_i16, write_i16, read_i16_be, read_i16_le, write_i16_be, write_i16_le, 2, "i16");
rw_pair!(i32, read_i32, write_i32, read_i32_be, read_i32_le, write_i32_be, write_i32_le, 4, "i32");

/// Reads an `f32` as raw bits, reinterpreted without normalization so NaN
/// payloads round-trip bit-exactly.
pub fn read_f32_be(slice: &[u8], offset: usize) -> Result<f32> {
    Ok(f32::from_bits(read_u32_be(slice, offset)?))
}

pub fn read_f32_le(slice: &[u8], offset: usize) -> Result<f32> {
    Ok(f32::from_bits(read_u32_le(slice, offset)?))
}

pub fn write_f32_be(out: &mut Vec<u8>, value: f32) {
    write_u32_be(out, value.to_bits());
}

pub fn write_f32_le(out: &mut Vec<u8>, value: f32) {
    write_u32_le(out, value.to_bits());
}

fn read_u16(slice: &[u8], offset: usize, endian: Endian) -> Result<u16> {
    match endian {
        Endian::Big => read_u16_be(slice, offset),
        Endian::Little => read_u16_le(slice, offset),
    }
}

fn read_u32(slice: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    match endian {
        Endian::Big => read_u32_be(slice, offset),
        Endian::Little => read_u32_le(slice, offset),
    }
}

fn read_u64(slice: &[u8], offset: usize, endian: Endian) -> Result<u64> {
    match endian {
        Endian::Big => read_u64_be(slice, offset),
        Endian::Little => read_u64_le(slice, offset),
    }
}

fn read_i16(slice: &[u8], offset: usize, endian: Endian) -> Result<i16> {
    match endian {
        Endian::Big => read_i16_be(slice, offset),
        Endian::Little => read_i16_le(slice, offset),
    }
}

fn read_i32(slice: &[u8], offset: usize, endian: Endian) -> Result<i32> {
    match endian {
        Endian::Big => read_i32_be(slice, offset),
        Endian::Little => read_i32_le(slice, offset),
    }
}

fn read_f32(slice: &[u8], offset: usize, endian: Endian) -> Result<f32> {
    match endian {
        Endian::Big => read_f32_be(slice, offset),
        Endian::Little => read_f32_le(slice, offset),
    }
}

fn write_u16(out: &mut Vec<u8>, value: u16, endian: Endian) {
    match endian {
        Endian::Big => write_u16_be(out, value),
        Endian::Little => write_u16_le(out, value),
    }
}

fn write_u32(out: &mut Vec<u8>, value: u32, endian: Endian) {
    match endian {
        Endian::Big => write_u32_be(out, value),
        Endian::Little => write_u32_le(out, value),
    }
}

fn write_u64(out: &mut Vec<u8>, value: u64, endian: Endian) {
    match endian {
        Endian::Big => write_u64_be(out, value),
        Endian::Little => write_u64_le(out, value),
    }
}

fn write_i16(out: &mut Vec<u8>, value: i16, endian: Endian) {
    match endian {
        Endian::Big => write_i16_be(out, value),
        Endian::Little => write_i16_le(out, value),
    }
}

fn write_i32(out: &mut Vec<u8>, value: i32, endian: Endian) {
    match endian {
        Endian::Big => write_i32_be(out, value),
        Endian::Little => write_i32_le(out, value),
    }
}

fn write_f32(out: &mut Vec<u8>, value: f32, endian: Endian) {
    match endian {
        Endian::Big => write_f32_be(out, value),
        Endian::Little => write_f32_le(out, value),
    }
}

/// Reads a value in `in_endian` and appends it to `out` in `out_endian`.
/// This is the single primitive the schema registry and converter driver
/// lean on for every scalar field swap.
pub fn swap_u16(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_u16(slice, offset, in_endian)?;
    write_u16(out, v, out_endian);
    Ok(())
}

pub fn swap_u32(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_u32(slice, offset, in_endian)?;
    write_u32(out, v, out_endian);
    Ok(())
}

pub fn swap_u64(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_u64(slice, offset, in_endian)?;
    write_u64(out, v, out_endian);
    Ok(())
}

pub fn swap_i16(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_i16(slice, offset, in_endian)?;
    write_i16(out, v, out_endian);
    Ok(())
}

pub fn swap_i32(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_i32(slice, offset, in_endian)?;
    write_i32(out, v, out_endian);
    Ok(())
}

pub fn swap_f32(slice: &[u8], offset: usize, in_endian: Endian, out: &mut Vec<u8>, out_endian: Endian) -> Result<()> {
    let v = read_f32(slice, offset, in_endian)?;
    write_f32(out, v, out_endian);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn be_le_roundtrip_u32() {
        let bytes = [0x00, 0x00, 0x00, 0x09];
        assert_eq!(read_u32_be(&bytes, 0).unwrap(), 9);
        let mut out = Vec::new();
        write_u32_le(&mut out, 9);
        assert_eq!(out, vec![0x09, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn f32_nan_bits_survive() {
        let nan_bits: u32 = 0x7fc0_0001;
        let mut be = Vec::new();
        write_u32_be(&mut be, nan_bits);
        let value = read_f32_be(&be, 0).unwrap();
        assert_eq!(value.to_bits(), nan_bits);

        let mut out = Vec::new();
        swap_f32(&be, 0, Endian::Big, &mut out, Endian::Little).unwrap();
        assert_eq!(read_u32_le(&out, 0).unwrap(), nan_bits);
    }

    #[test]
    fn truncated_read_fails() {
        let bytes = [0x00, 0x01];
        assert!(read_u32_be(&bytes, 0).is_err());
    }

    #[test]
    fn swap_u32_be_to_le() {
        let bytes = [0x00, 0x00, 0x48, 0x41]; // 12.5f32 big-endian bits would differ; raw u32 here
        let mut out = Vec::new();
        swap_u32(&bytes, 0, Endian::Big, &mut out, Endian::Little).unwrap();
        assert_eq!(read_u32_le(&out, 0).unwrap(), read_u32_be(&bytes, 0).unwrap());
    }
}
