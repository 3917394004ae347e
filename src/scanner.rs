//! Recursive descent over GRUPs and records (§2 item 4, §4.7).
//!
//! Produces a flat, ordered sequence of `RecordDescriptor`s: the file
//! header, then every top-level GRUP and its descendants depth-first.
//! This is a read-only view — `scan_records` never mutates anything and
//! is unaffected by converter skip options (see §4.5.1).

use crate::error::{Error, Result};
use crate::model::{RecordDescriptor, RecordHeader};
use crate::parser::{self, GRUP_SIGNATURE};

/// GRUP nesting deeper than this aborts the scan (§4.7, §9).
pub const MAX_GRUP_DEPTH: u32 = 8;

/// Scans the whole file and returns every record/GRUP descriptor in
/// input order, depth-first.
pub fn scan_records(bytes: &[u8]) -> Result<Vec<RecordDescriptor>> {
    let header = parser::parse_file_header(bytes)?;
    let mut out = Vec::new();

    let tes4_span = (RecordHeader::SIZE as u64) + u64::from(header.data_size);
    out.push(RecordDescriptor {
        offset: 0,
        signature: parser::TES4_SIGNATURE,
        data_size: header.data_size,
        flags: header.flags,
        form_id: header.form_id,
        span: tes4_span,
        is_grup: false,
    });

    let mut pos = tes4_span;
    while (pos as usize) < bytes.len() {
        pos = scan_one(bytes, pos, header.is_big_endian, 0, &mut out)?;
    }

    Ok(out)
}

/// Scans a single top-level item (record or GRUP) at `offset`, recursing
/// into GRUP children, and returns the offset immediately following it.
fn scan_one(
    bytes: &[u8],
    offset: u64,
    big_endian: bool,
    depth: u32,
    out: &mut Vec<RecordDescriptor>,
) -> Result<u64> {
    if depth > MAX_GRUP_DEPTH {
        return Err(Error::Unsupported("GRUP nesting exceeds the depth cap"));
    }

    let off = offset as usize;
    if off + 4 > bytes.len() {
        return Err(Error::Truncated {
            what: "record/GRUP signature",
            offset,
            len: bytes.len(),
        });
    }
    let mut signature = [0u8; 4];
    signature.copy_from_slice(&bytes[off..off + 4]);

    if signature == GRUP_SIGNATURE {
        let grup = parser::parse_grup_header(bytes, off, big_endian)?;
        let end = offset + u64::from(grup.group_size);

        out.push(RecordDescriptor {
            offset,
            signature,
            data_size: grup.group_size.saturating_sub(RecordHeader::SIZE as u32),
            flags: 0,
            form_id: 0,
            span: u64::from(grup.group_size),
            is_grup: true,
        });

        // Walk children only as far as real data and the declared span
        // both allow; a GRUP that overclaims its size is detected below
        // by comparing the consumed span to `end`, not by bailing early.
        let mut child_pos = offset + RecordHeader::SIZE as u64;
        let mut child_total = 0u32;
        while child_pos < end && (child_pos as usize) < bytes.len() {
            let next = scan_one(bytes, child_pos, big_endian, depth + 1, out)?;
            child_total += (next - child_pos) as u32;
            child_pos = next;
        }

        if child_pos != end {
            return Err(Error::GroupSpanMismatch {
                offset,
                declared: grup.group_size,
                computed: child_total + RecordHeader::SIZE as u32,
            });
        }

        Ok(child_pos)
    } else {
        let header = parser::parse_record_header(bytes, off, big_endian)?.ok_or(
            Error::Truncated {
                what: "record header (invalid signature)",
                offset,
                len: bytes.len(),
            },
        )?;
        let span = u64::from(RecordHeader::SIZE as u32 + header.data_size);
        let end = offset + span;
        if end > bytes.len() as u64 {
            return Err(Error::Truncated {
                what: "record payload",
                offset,
                len: bytes.len(),
            });
        }

        out.push(RecordDescriptor {
            offset,
            signature: header.signature,
            data_size: header.data_size,
            flags: header.flags,
            form_id: header.form_id,
            span,
            is_grup: false,
        });

        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tes4_only(data_size: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"TES4");
        bytes.extend_from_slice(&data_size.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0x2Cu16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes
    }

    #[test]
    fn scans_minimal_file() {
        let bytes = tes4_only(0);
        let records = scan_records(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].signature, *b"TES4");
    }

    #[test]
    fn detects_group_span_mismatch() {
        let mut bytes = tes4_only(0);
        // A CELL GRUP declaring groupSize=100 but the file only holds a
        // single 24-byte child record (consumed span 48, not 100).
        bytes.extend_from_slice(b"GRUP");
        bytes.extend_from_slice(&100u32.to_be_bytes()); // groupSize overclaims the span
        bytes.extend_from_slice(b"CELL"); // label
        bytes.extend_from_slice(&0i32.to_be_bytes()); // groupType 0
        bytes.extend_from_slice(&0u32.to_be_bytes()); // stamp
        bytes.extend_from_slice(&0u32.to_be_bytes()); // unknown
        // one child record, only 24 bytes -> total child span 24, not 24 (48-24)
        bytes.extend_from_slice(b"CELL");
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0x2Cu16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());

        let err = scan_records(&bytes).unwrap_err();
        assert!(matches!(err, Error::GroupSpanMismatch { .. }));
    }
}
