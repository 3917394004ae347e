//! Typed field layouts ("schemas") and the slot-by-slot byte swapper.
//!
//! Schemas are data, not a class hierarchy (see DESIGN NOTES in the
//! specification): a `Schema` is just an ordered `Vec<Slot>`, built as a
//! literal in `tables.rs`.

use crate::binary::{self, Endian};
use crate::error::Result;

/// A single typed field within a subrecord's payload.
#[derive(Debug, Clone)]
pub enum Slot {
    U16,
    I16,
    U32,
    I32,
    F32,
    U64,
    /// Raw bytes copied verbatim, no swap (textures, padding, gradients).
    RawBytes(usize),
    /// NUL-terminated or bare string payload, copied verbatim. Always the
    /// sole slot in a schema — strings are handled before any schema
    /// lookup happens (§4.4 step 1) but the slot exists so a schema can
    /// still describe a string-shaped tail field if one ever appears.
    ZString,
    /// Fixed-width non-NUL-terminated string, copied verbatim.
    CString(usize),
    /// A repeated struct: `stride` bytes per element, described by
    /// `inner`. When this is the last slot in a schema, the element
    /// count is inferred from the remaining payload length.
    Array(usize, Vec<Slot>),
}

pub type Schema = Vec<Slot>;

/// Size in bytes of a single (non-array) slot, or the per-element stride
/// for an `Array`.
#[must_use]
pub fn slot_size(slot: &Slot) -> usize {
    match slot {
        Slot::U16 | Slot::I16 => 2,
        Slot::U32 | Slot::I32 | Slot::F32 => 4,
        Slot::U64 => 8,
        Slot::RawBytes(n) | Slot::CString(n) => *n,
        Slot::ZString => 0,
        Slot::Array(stride, _) => *stride,
    }
}

/// Sum of a schema's fixed-size slots, ignoring a trailing open-ended
/// `Array` (callers use this to validate exact-size schemas and to find
/// the open-ended prefix length).
#[must_use]
pub fn fixed_prefix_size(schema: &Schema) -> usize {
    schema
        .iter()
        .map(|slot| match slot {
            Slot::Array(..) => 0,
            other => slot_size(other),
        })
        .sum()
}

/// `true` if the schema's last slot is an `Array` (open-ended).
#[must_use]
pub fn is_open_ended(schema: &Schema) -> bool {
    matches!(schema.last(), Some(Slot::Array(..)))
}

/// Converts one subrecord payload according to `schema`, swapping every
/// typed field from `in_endian` to `out_endian` and copying raw/string
/// slots verbatim. `in_bytes` must be exactly the subrecord's data span
/// (the 6-byte header is handled by the converter driver, not here).
pub fn convert_subrecord(
    schema: &Schema,
    in_bytes: &[u8],
    out_bytes: &mut Vec<u8>,
    in_endian: Endian,
    out_endian: Endian,
) -> Result<()> {
    let mut pos = 0usize;
    for slot in schema {
        if let Slot::Array(stride, inner) = slot {
            // Open-ended: consume every remaining whole element.
            while pos < in_bytes.len() {
                pos = convert_struct(inner, in_bytes, pos, *stride, out_bytes, in_endian, out_endian)?;
            }
        } else {
            pos = convert_scalar_slot(slot, in_bytes, pos, out_bytes, in_endian, out_endian)?;
        }
    }
    Ok(())
}

fn convert_struct(
    inner: &[Slot],
    in_bytes: &[u8],
    start: usize,
    stride: usize,
    out_bytes: &mut Vec<u8>,
    in_endian: Endian,
    out_endian: Endian,
) -> Result<usize> {
    let mut pos = start;
    for slot in inner {
        pos = convert_scalar_slot(slot, in_bytes, pos, out_bytes, in_endian, out_endian)?;
    }
    debug_assert_eq!(pos - start, stride, "array element slots must sum to stride");
    Ok(start + stride)
}

fn convert_scalar_slot(
    slot: &Slot,
    in_bytes: &[u8],
    pos: usize,
    out_bytes: &mut Vec<u8>,
    in_endian: Endian,
    out_endian: Endian,
) -> Result<usize> {
    match slot {
        Slot::U16 => {
            binary::swap_u16(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 2)
        }
        Slot::I16 => {
            binary::swap_i16(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 2)
        }
        Slot::U32 => {
            binary::swap_u32(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 4)
        }
        Slot::I32 => {
            binary::swap_i32(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 4)
        }
        Slot::F32 => {
            binary::swap_f32(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 4)
        }
        Slot::U64 => {
            binary::swap_u64(in_bytes, pos, in_endian, out_bytes, out_endian)?;
            Ok(pos + 8)
        }
        Slot::RawBytes(n) | Slot::CString(n) => {
            out_bytes.extend_from_slice(&in_bytes[pos..pos + n]);
            Ok(pos + n)
        }
        Slot::ZString => {
            out_bytes.extend_from_slice(&in_bytes[pos..]);
            Ok(in_bytes.len())
        }
        Slot::Array(..) => unreachable!("nested open-ended arrays are not supported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_schema_swaps_every_field() {
        // HEDR: { f32 version, u32 numRecords, u32 nextFormId }
        let schema: Schema = vec![Slot::F32, Slot::U32, Slot::U32];
        let mut input = Vec::new();
        binary::write_f32_be(&mut input, 1.7);
        binary::write_u32_be(&mut input, 42);
        binary::write_u32_be(&mut input, 0xDEAD_BEEF);

        let mut out = Vec::new();
        convert_subrecord(&schema, &input, &mut out, Endian::Big, Endian::Little).unwrap();

        assert_eq!(binary::read_f32_le(&out, 0).unwrap(), 1.7);
        assert_eq!(binary::read_u32_le(&out, 4).unwrap(), 42);
        assert_eq!(binary::read_u32_le(&out, 8).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn open_ended_array_consumes_all_elements() {
        // XCLR: array of u32 region formIds
        let schema: Schema = vec![Slot::Array(4, vec![Slot::U32])];
        let mut input = Vec::new();
        binary::write_u32_be(&mut input, 1);
        binary::write_u32_be(&mut input, 2);
        binary::write_u32_be(&mut input, 3);

        let mut out = Vec::new();
        convert_subrecord(&schema, &input, &mut out, Endian::Big, Endian::Little).unwrap();

        assert_eq!(out.len(), 12);
        assert_eq!(binary::read_u32_le(&out, 0).unwrap(), 1);
        assert_eq!(binary::read_u32_le(&out, 8).unwrap(), 3);
    }

    #[test]
    fn raw_bytes_pass_through_unchanged() {
        let schema: Schema = vec![Slot::RawBytes(3)];
        let input = [0xDE, 0xAD, 0xBE];
        let mut out = Vec::new();
        convert_subrecord(&schema, &input, &mut out, Endian::Big, Endian::Little).unwrap();
        assert_eq!(out, input);
    }
}
