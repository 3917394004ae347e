//! Record and GRUP header parsing (§4.2 of the specification).
//!
//! Decodes the 24-byte main-record and GRUP headers and determines file
//! endianness from the `TES4` header's plausible `dataSize` interpretation.

use crate::binary::{read_i32_be, read_i32_le, read_u16_be, read_u16_le, read_u32_be, read_u32_le};
use crate::error::{Error, Result};
use crate::model::{FileHeader, GrupHeader, RecordHeader};

pub const GRUP_SIGNATURE: [u8; 4] = *b"GRUP";
pub const TES4_SIGNATURE: [u8; 4] = *b"TES4";

#[must_use]
pub fn is_grup(signature: &[u8; 4]) -> bool {
    *signature == GRUP_SIGNATURE
}

fn is_valid_signature_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

/// Validates that `signature` is 4 printable ASCII uppercase letters or
/// digits, per §4.2.
#[must_use]
pub fn is_valid_signature(signature: &[u8; 4]) -> bool {
    signature.iter().all(|&b| is_valid_signature_byte(b))
}

/// Parses the first 24 bytes of the file as the `TES4` header and
/// determines file endianness.
///
/// Tries both endian interpretations of `dataSize`; the interpretation
/// that yields a value strictly less than the file length is chosen. If
/// both (or neither) are plausible, `version` breaks the tie.
pub fn parse_file_header(bytes: &[u8]) -> Result<FileHeader> {
    if bytes.len() < RecordHeader::SIZE {
        return Err(Error::Truncated {
            what: "TES4 header",
            offset: 0,
            len: bytes.len(),
        });
    }

    let mut signature = [0u8; 4];
    signature.copy_from_slice(&bytes[0..4]);
    if signature != TES4_SIGNATURE {
        return Err(Error::NotEsm(signature));
    }

    let data_size_be = read_u32_be(bytes, 4)?;
    let data_size_le = read_u32_le(bytes, 4)?;
    let file_len = bytes.len() as u32;

    let (data_size, is_big_endian) = match (
        data_size_be < file_len,
        data_size_le < file_len,
    ) {
        (true, false) => (data_size_be, true),
        (false, true) => (data_size_le, false),
        // Both or neither plausible (e.g. dataSize == 0, which reads the
        // same either way): `dataSize` alone cannot disambiguate, so fall
        // back to `version`, which is a small plausible record-format
        // number in one byte order and implausibly large in the other.
        _ => {
            let version_be = read_u16_be(bytes, 20)?;
            let version_le = read_u16_le(bytes, 20)?;
            if version_le < version_be {
                (data_size_le, false)
            } else {
                (data_size_be, true)
            }
        }
    };

    let (flags, form_id, revision, version, unknown) = if is_big_endian {
        (
            read_u32_be(bytes, 8)?,
            read_u32_be(bytes, 12)?,
            read_u32_be(bytes, 16)?,
            read_u16_be(bytes, 20)?,
            read_u16_be(bytes, 22)?,
        )
    } else {
        (
            read_u32_le(bytes, 8)?,
            read_u32_le(bytes, 12)?,
            read_u32_le(bytes, 16)?,
            read_u16_le(bytes, 20)?,
            read_u16_le(bytes, 22)?,
        )
    };

    Ok(FileHeader {
        data_size,
        flags,
        form_id,
        revision,
        version,
        unknown,
        is_big_endian,
    })
}

/// Parses a 24-byte main-record header at `bytes[offset..]`.
///
/// Returns `Ok(None)` if the signature is not 4 valid signature bytes,
/// matching the "otherwise returns none" fallback rule in §4.2 (this is
/// not an error: callers use it to detect end-of-stream or corruption
/// without aborting the whole scan).
pub fn parse_record_header(bytes: &[u8], offset: usize, big_endian: bool) -> Result<Option<RecordHeader>> {
    if offset + RecordHeader::SIZE > bytes.len() {
        return Err(Error::Truncated {
            what: "record header",
            offset: offset as u64,
            len: bytes.len(),
        });
    }

    let mut signature = [0u8; 4];
    signature.copy_from_slice(&bytes[offset..offset + 4]);
    if !is_valid_signature(&signature) {
        return Ok(None);
    }

    let (data_size, flags, form_id, revision, version, unknown) = if big_endian {
        (
            read_u32_be(bytes, offset + 4)?,
            read_u32_be(bytes, offset + 8)?,
            read_u32_be(bytes, offset + 12)?,
            read_u32_be(bytes, offset + 16)?,
            read_u16_be(bytes, offset + 20)?,
            read_u16_be(bytes, offset + 22)?,
        )
    } else {
        (
            read_u32_le(bytes, offset + 4)?,
            read_u32_le(bytes, offset + 8)?,
            read_u32_le(bytes, offset + 12)?,
            read_u32_le(bytes, offset + 16)?,
            read_u16_le(bytes, offset + 20)?,
            read_u16_le(bytes, offset + 22)?,
        )
    };

    Ok(Some(RecordHeader {
        signature,
        data_size,
        flags,
        form_id,
        revision,
        version,
        unknown,
    }))
}

/// Parses a 24-byte GRUP header at `bytes[offset..]`. The caller must
/// already know `bytes[offset..offset+4] == "GRUP"`; `label` bytes are
/// returned raw since their interpretation depends on `groupType`.
pub fn parse_grup_header(bytes: &[u8], offset: usize, big_endian: bool) -> Result<GrupHeader> {
    if offset + GrupHeader::SIZE > bytes.len() {
        return Err(Error::Truncated {
            what: "GRUP header",
            offset: offset as u64,
            len: bytes.len(),
        });
    }

    let mut label = [0u8; 4];
    label.copy_from_slice(&bytes[offset + 8..offset + 12]);

    let (group_size, group_type, stamp, unknown) = if big_endian {
        (
            read_u32_be(bytes, offset + 4)?,
            read_i32_be(bytes, offset + 12)?,
            read_u32_be(bytes, offset + 16)?,
            read_u32_be(bytes, offset + 20)?,
        )
    } else {
        (
            read_u32_le(bytes, offset + 4)?,
            read_i32_le(bytes, offset + 12)?,
            read_u32_le(bytes, offset + 16)?,
            read_u32_le(bytes, offset + 20)?,
        )
    };

    Ok(GrupHeader {
        group_size,
        label,
        group_type,
        stamp,
        unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_tes4_be() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"TES4");
        bytes.extend_from_slice(&0u32.to_be_bytes()); // dataSize
        bytes.extend_from_slice(&0u32.to_be_bytes()); // flags
        bytes.extend_from_slice(&0u32.to_be_bytes()); // formId
        bytes.extend_from_slice(&0u32.to_be_bytes()); // revision
        bytes.extend_from_slice(&0x2Cu16.to_be_bytes()); // version
        bytes.extend_from_slice(&0u16.to_be_bytes()); // unknown
        bytes
    }

    #[test]
    fn parses_minimal_tes4() {
        let bytes = minimal_tes4_be();
        let header = parse_file_header(&bytes).unwrap();
        assert!(header.is_big_endian);
        assert_eq!(header.version, 0x2C);
    }

    #[test]
    fn ambiguous_all_zero_datasize_breaks_tie_on_version() {
        let be = minimal_tes4_be();
        assert!(parse_file_header(&be).unwrap().is_big_endian);

        let mut le = Vec::new();
        le.extend_from_slice(b"TES4");
        le.extend_from_slice(&0u32.to_le_bytes()); // dataSize
        le.extend_from_slice(&0u32.to_le_bytes()); // flags
        le.extend_from_slice(&0u32.to_le_bytes()); // formId
        le.extend_from_slice(&0u32.to_le_bytes()); // revision
        le.extend_from_slice(&0x2Cu16.to_le_bytes()); // version
        le.extend_from_slice(&0u16.to_le_bytes()); // unknown
        assert!(!parse_file_header(&le).unwrap().is_big_endian);
    }

    #[test]
    fn rejects_non_tes4() {
        let mut bytes = minimal_tes4_be();
        bytes[0] = b'X';
        assert!(matches!(parse_file_header(&bytes), Err(Error::NotEsm(_))));
    }

    #[test]
    fn invalid_signature_is_none_not_error() {
        let bytes = vec![0u8; 24];
        assert!(parse_record_header(&bytes, 0, true).unwrap().is_none());
    }

    #[test]
    fn grup_vs_record_dispatch() {
        assert!(is_grup(&GRUP_SIGNATURE));
        assert!(!is_grup(b"LAND"));
    }
}
