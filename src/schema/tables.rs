//! The static schema catalog (§4.4).
//!
//! Everything here is data: literal tables matched by record type and/or
//! subrecord signature. Adding a new layout means adding a match arm, not
//! a new type.

use super::slots::{Schema, Slot};

/// Subrecord signatures that are zero-terminated (or bare) strings in
/// every record type. Strings are endian-agnostic and pass through
/// unchanged.
pub const STRING_SUBRECORDS_GLOBAL: [[u8; 4]; 4] = [*b"EDID", *b"FULL", *b"MODL", *b"ICON"];

/// Per-record-type string signature overrides, in addition to the global
/// set.
#[must_use]
pub fn string_subrecords_for_record(record_type: &[u8; 4]) -> &'static [[u8; 4]] {
    match record_type {
        b"INFO" => &[*b"NAM1"],
        b"QUST" => &[*b"NNAM"],
        b"BOOK" => &[*b"DESC", *b"CNAM"],
        _ => &[],
    }
}

#[must_use]
pub fn is_string_subrecord(sig: &[u8; 4], record_type: &[u8; 4]) -> bool {
    STRING_SUBRECORDS_GLOBAL.contains(sig) || string_subrecords_for_record(record_type).contains(sig)
}

/// Resolution step 2: `(recordType, sig, exactSize) -> Schema`.
#[must_use]
pub fn exact_size_schema(record_type: &[u8; 4], sig: &[u8; 4], size: usize) -> Option<Schema> {
    match (record_type, sig, size) {
        (b"TES4", b"HEDR", 12) => Some(vec![Slot::F32, Slot::U32, Slot::U32]),
        (b"WEAP", b"DATA", 136) => Some(vec![Slot::U32; 34]),
        (b"CELL", b"DATA", 2) => Some(vec![Slot::U16]),
        (b"LAND", b"DATA", 4) => Some(vec![Slot::U32]),
        (b"LAND", b"VNML", 3267) => Some(vec![Slot::RawBytes(3267)]), // 33*33*3, no swap (signed bytes)
        (b"LAND", b"VHGT", 1096) => Some(vec![
            Slot::F32,
            Slot::RawBytes(1089), // i8 gradients: single bytes, endian-agnostic
            Slot::RawBytes(3),    // trailing pad
        ]),
        (b"LAND", b"ATXT", 8) | (b"LAND", b"BTXT", 8) => Some(vec![
            Slot::U32,        // formId
            Slot::RawBytes(1), // quadrant (u8, no swap needed)
            Slot::RawBytes(1), // unk (u8)
            Slot::U16,        // layer
        ]),
        _ => None,
    }
}

/// Resolution step 3: `(recordType, sig, *) -> Schema` where the final
/// slot is an open-ended `Array`. Callers must additionally verify
/// `(size - fixed_prefix_size(schema)) % stride == 0`.
#[must_use]
pub fn open_ended_schema(record_type: &[u8; 4], sig: &[u8; 4]) -> Option<Schema> {
    match (record_type, sig) {
        (b"LAND", b"VCLR") => Some(vec![Slot::Array(1, vec![Slot::RawBytes(1)])]),
        (b"LAND", b"VTXT") => Some(vec![Slot::Array(
            8,
            vec![Slot::U16, Slot::U16, Slot::F32],
        )]),
        (b"CELL", b"XCLR") => Some(vec![Slot::Array(4, vec![Slot::U32])]),
        (b"TES4", b"OFST") | (b"TES4", b"DELE") => {
            Some(vec![Slot::Array(1, vec![Slot::RawBytes(1)])])
        }
        _ => None,
    }
}

/// Resolution step 4: `sig -> Schema`, independent of record type.
#[must_use]
pub fn signature_only_schema(sig: &[u8; 4]) -> Option<Schema> {
    match sig {
        b"NAME" | b"PNAM" | b"SNAM" | b"TNAM" | b"XLCM" | b"XOWN" => Some(vec![Slot::U32]),
        b"XCLC" => Some(vec![Slot::I32, Slot::I32, Slot::U32]),
        b"XLOC" => Some(vec![Slot::U32, Slot::U32]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hedr_has_exact_schema() {
        let schema = exact_size_schema(b"TES4", b"HEDR", 12).unwrap();
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn string_subrecord_resolution() {
        assert!(is_string_subrecord(b"EDID", b"LAND"));
        assert!(is_string_subrecord(b"NAM1", b"INFO"));
        assert!(!is_string_subrecord(b"NAM1", b"LAND"));
    }

    #[test]
    fn xclc_is_record_type_independent() {
        assert!(signature_only_schema(b"XCLC").is_some());
    }
}
