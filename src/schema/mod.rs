//! The subrecord schema registry (§4.4): given a record type, a
//! subrecord signature, and a payload length, resolves the field layout
//! to use for the byte swap.

pub mod fallback;
pub mod slots;
pub mod tables;

pub use fallback::FallbackKind;
pub use slots::{Schema, Slot};

/// Outcome of a schema lookup: either an explicit layout was found, the
/// payload is a string (passed through untouched), or no entry matched
/// and the caller must fall back (§4.6).
#[derive(Debug, Clone)]
pub enum Resolution {
    String,
    Schema(Schema),
    Fallback,
}

/// Resolves the layout for one subrecord, following the order in §4.4:
/// string set, exact-size, open-ended, signature-only, fallback.
#[must_use]
pub fn resolve(record_type: &[u8; 4], sig: &[u8; 4], size: usize) -> Resolution {
    if tables::is_string_subrecord(sig, record_type) {
        return Resolution::String;
    }
    if let Some(schema) = tables::exact_size_schema(record_type, sig, size) {
        return Resolution::Schema(schema);
    }
    if let Some(schema) = tables::open_ended_schema(record_type, sig) {
        if let Some(Slot::Array(stride, _)) = schema.last() {
            let prefix = slots::fixed_prefix_size(&schema);
            if size >= prefix && (size - prefix) % stride == 0 {
                return Resolution::Schema(schema);
            }
        }
    }
    if let Some(schema) = tables::signature_only_schema(sig) {
        return Resolution::Schema(schema);
    }
    Resolution::Fallback
}

#[must_use]
pub fn is_string_subrecord(sig: &[u8; 4], record_type: &[u8; 4]) -> bool {
    tables::is_string_subrecord(sig, record_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_resolution_short_circuits() {
        assert!(matches!(resolve(b"LAND", b"EDID", 5), Resolution::String));
    }

    #[test]
    fn exact_size_beats_open_ended_and_signature_only() {
        assert!(matches!(
            resolve(b"LAND", b"DATA", 4),
            Resolution::Schema(_)
        ));
    }

    #[test]
    fn unknown_falls_back() {
        assert!(matches!(resolve(b"XYZZ", b"ZZZZ", 16), Resolution::Fallback));
    }

    #[test]
    fn open_ended_rejects_misaligned_size() {
        // XCLR stride is 4; 6 bytes cannot divide evenly.
        assert!(matches!(
            resolve(b"CELL", b"XCLR", 6),
            Resolution::Fallback
        ));
    }
}
