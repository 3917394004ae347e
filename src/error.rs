//! Error types for the ESM endianness converter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an ESM/ESP/ESL plugin: expected TES4 signature, found {0:?}")]
    NotEsm([u8; 4]),

    #[error("input at offset {offset} is already little-endian")]
    WrongEndian { offset: u64 },

    #[error("{what} at offset {offset} extends past end of file ({len} bytes available)")]
    Truncated {
        what: &'static str,
        offset: u64,
        len: usize,
    },

    #[error("subrecord stream in record at offset {record_offset} left {remainder} ragged bytes")]
    RaggedPayload {
        record_offset: u64,
        remainder: usize,
    },

    #[error(
        "GRUP at offset {offset} declares groupSize {declared} but children sum to {computed}"
    )]
    GroupSpanMismatch {
        offset: u64,
        declared: u32,
        computed: u32,
    },

    #[error("output position {output_pos} diverged from input position {input_pos} at offset {offset}")]
    LengthDrift {
        offset: u64,
        input_pos: u64,
        output_pos: u64,
    },

    #[error(
        "no schema for subrecord {sig} (record type {record_type}, size {size}) at offset {offset}"
    )]
    UnknownSubrecord {
        offset: u64,
        record_type: String,
        sig: String,
        size: usize,
    },

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("invalid record-type signature {0:?}: must be 4 printable uppercase ASCII letters or digits")]
    InvalidSignature([u8; 4]),

    #[error("invalid hex formId {0:?}: {1}")]
    InvalidFormId(String, std::num::ParseIntError),
}

pub type Result<T> = std::result::Result<T, Error>;
