//! Deterministic handling for subrecords with no registry entry (§4.6).

use crate::binary::Endian;
use crate::error::Result;

use super::slots::{convert_subrecord, Schema, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FallbackKind {
    AllZero,
    PureString,
    AlignedU32,
    AlignedU16,
    Opaque,
}

impl std::fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FallbackKind::AllZero => "AllZero",
            FallbackKind::PureString => "PureString",
            FallbackKind::AlignedU32 => "AlignedU32",
            FallbackKind::AlignedU16 => "AlignedU16",
            FallbackKind::Opaque => "Opaque",
        };
        write!(f, "{name}")
    }
}

fn is_all_zero(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}

fn is_pure_string(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return false;
    };
    let nul_count = s.matches('\0').count();
    let single_trailing_nul = nul_count == 1 && s.ends_with('\0');
    let printable_ascii = nul_count == 0 && s.bytes().all(|b| (0x20..0x7f).contains(&b));
    single_trailing_nul || printable_ascii
}

/// Classifies a payload that has no explicit schema. Order matters: the
/// first matching rule wins, exactly as listed in §4.6.
#[must_use]
pub fn classify(data: &[u8]) -> FallbackKind {
    if is_all_zero(data) {
        FallbackKind::AllZero
    } else if is_pure_string(data) {
        FallbackKind::PureString
    } else if !data.is_empty() && data.len() % 4 == 0 {
        FallbackKind::AlignedU32
    } else if !data.is_empty() && data.len() % 2 == 0 {
        FallbackKind::AlignedU16
    } else {
        FallbackKind::Opaque
    }
}

/// Applies the fallback handling determined by `classify` to one payload.
pub fn apply(
    kind: FallbackKind,
    data: &[u8],
    out: &mut Vec<u8>,
    in_endian: Endian,
    out_endian: Endian,
) -> Result<()> {
    match kind {
        FallbackKind::AllZero | FallbackKind::PureString | FallbackKind::Opaque => {
            out.extend_from_slice(data);
            Ok(())
        }
        FallbackKind::AlignedU32 => {
            let schema: Schema = vec![Slot::Array(4, vec![Slot::U32])];
            convert_subrecord(&schema, data, out, in_endian, out_endian)
        }
        FallbackKind::AlignedU16 => {
            let schema: Schema = vec![Slot::Array(2, vec![Slot::U16])];
            convert_subrecord(&schema, data, out, in_endian, out_endian)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_wins_over_alignment() {
        let data = [0u8; 8];
        assert_eq!(classify(&data), FallbackKind::AllZero);
    }

    #[test]
    fn pure_string_detected() {
        let data = b"Hello\0";
        assert_eq!(classify(data), FallbackKind::PureString);
    }

    #[test]
    fn aligned_u32_for_non_string_multiple_of_four() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(classify(&data), FallbackKind::AlignedU32);
    }

    #[test]
    fn odd_length_opaque() {
        let data = [1u8, 2, 3];
        assert_eq!(classify(&data), FallbackKind::Opaque);
    }

    #[test]
    fn aligned_u32_swaps_as_array() {
        let data = [0x00, 0x00, 0x00, 0x09];
        let mut out = Vec::new();
        apply(FallbackKind::AlignedU32, &data, &mut out, Endian::Big, Endian::Little).unwrap();
        assert_eq!(out, vec![0x09, 0x00, 0x00, 0x00]);
    }
}
