//! Subrecord-stream conversion shared by the `TES4` header and every
//! main record (§4.4, §4.5, §4.6).

use crate::binary::{self, read_u16_be, read_u32_be, Endian};
use crate::error::{Error, Result};
use crate::model::signature_str;
use crate::schema::{self, slots::convert_subrecord, Resolution};
use crate::subrecord::XXXX_SIGNATURE;

use super::options::ConvertOptions;
use super::stats::Stats;

const HEADER_SIZE: usize = 6;

/// Converts every subrecord in `payload` (a record's decompressed data
/// span), appending the little-endian result to `out`.
///
/// `num_records_patch`, when `Some`, is applied to the `TES4/HEDR`
/// subrecord's `numRecords` field after the normal schema-driven swap —
/// the mechanism behind §4.5.1's record-skip accounting.
pub fn convert_subrecord_stream(
    record_type: &[u8; 4],
    payload: &[u8],
    record_offset: u64,
    options: &ConvertOptions,
    stats: &mut Stats,
    out: &mut Vec<u8>,
    num_records_patch: Option<u32>,
) -> Result<()> {
    let in_endian = Endian::Big;
    let out_endian = Endian::Little;

    let mut pos = 0usize;
    let mut pending_override: Option<u32> = None;

    while pos < payload.len() {
        let remaining = payload.len() - pos;
        if remaining < HEADER_SIZE {
            return Err(Error::RaggedPayload {
                record_offset,
                remainder: remaining,
            });
        }

        let mut sig = [0u8; 4];
        sig.copy_from_slice(&payload[pos..pos + 4]);

        if sig == XXXX_SIGNATURE {
            out.extend_from_slice(&sig);
            binary::swap_u16(payload, pos + 4, in_endian, out, out_endian)?;
            let override_offset = pos + HEADER_SIZE;
            let override_value = read_u32_be(payload, override_offset)?;
            binary::swap_u32(payload, override_offset, in_endian, out, out_endian)?;
            pending_override = Some(override_value);
            pos = override_offset + 4;
            stats.xxxx_sentinels += 1;
            continue;
        }

        let declared = read_u16_be(payload, pos + 4)?;
        let size = pending_override.take().unwrap_or(u32::from(declared)) as usize;
        let data_start = pos + HEADER_SIZE;
        let data_end = data_start + size;
        if data_end > payload.len() {
            return Err(Error::Truncated {
                what: "subrecord payload",
                offset: record_offset + data_start as u64,
                len: payload.len(),
            });
        }
        let data = &payload[data_start..data_end];

        out.extend_from_slice(&sig);
        binary::swap_u16(payload, pos + 4, in_endian, out, out_endian)?;

        match schema::resolve(record_type, &sig, size) {
            Resolution::String => out.extend_from_slice(data),
            Resolution::Schema(s) => convert_subrecord(&s, data, out, in_endian, out_endian)?,
            Resolution::Fallback => {
                let kind = schema::fallback::classify(data);
                schema::fallback::apply(kind, data, out, in_endian, out_endian)?;
                stats.record_fallback(kind, *record_type, sig, size);
                if options.strict_unknown {
                    return Err(Error::UnknownSubrecord {
                        offset: record_offset + pos as u64,
                        record_type: signature_str(record_type),
                        sig: signature_str(&sig),
                        size,
                    });
                }
            }
        }

        if let Some(patched) = num_records_patch {
            if record_type == b"TES4" && sig == *b"HEDR" {
                let data_offset = out.len() - size;
                out[data_offset + 4..data_offset + 8].copy_from_slice(&patched.to_le_bytes());
            }
        }

        stats.subrecords_converted += 1;
        pos = data_end;
    }

    Ok(())
}
