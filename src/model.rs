//! Structural types shared by the parser, scanner, and converter driver.

/// Bit in `RecordHeader::flags` marking a compressed payload.
pub const FLAG_COMPRESSED: u32 = 0x0004_0000;

/// Bit in the `TES4` record's own `flags` field that this toolchain uses
/// to mark a big-endian (Xbox 360) source file. Cleared in every
/// converted output (§3 invariant: "the `TES4` record's endianness flag
/// in the output indicates little-endian").
pub const FLAG_BIG_ENDIAN_PLATFORM: u32 = 0x0000_0002;

/// The mandatory first record of an ESM/ESP/ESL file.
#[derive(Debug, Clone, Copy)]
pub struct FileHeader {
    pub data_size: u32,
    pub flags: u32,
    pub form_id: u32,
    pub revision: u32,
    pub version: u16,
    pub unknown: u16,
    pub is_big_endian: bool,
}

/// A main-record header: 24 bytes, `signature != "GRUP"`.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub signature: [u8; 4],
    pub data_size: u32,
    pub flags: u32,
    pub form_id: u32,
    pub revision: u32,
    pub version: u16,
    pub unknown: u16,
}

impl RecordHeader {
    pub const SIZE: usize = 24;

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }
}

/// A GRUP (group) header: 24 bytes, `signature == "GRUP"`.
#[derive(Debug, Clone, Copy)]
pub struct GrupHeader {
    pub group_size: u32,
    pub label: [u8; 4],
    pub group_type: i32,
    pub stamp: u32,
    pub unknown: u32,
}

impl GrupHeader {
    pub const SIZE: usize = 24;
}

/// GRUP `groupType` values that interpret `label` as a formId rather than
/// a signature or cell coordinates (see §4.5 of the specification).
pub const FORM_ID_LABEL_GROUP_TYPES: [i32; 6] = [1, 6, 7, 8, 9, 10];
/// GRUP `groupType` values that interpret `label` as two signed i16 cell
/// coordinates.
pub const CELL_COORD_LABEL_GROUP_TYPES: [i32; 2] = [4, 5];

/// A flattened, read-only view of a record or GRUP discovered while
/// scanning the file. Produced by the scanner; consumed by the converter
/// driver's skip-accounting pre-pass and by `scan_records`.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub offset: u64,
    pub signature: [u8; 4],
    pub data_size: u32,
    pub flags: u32,
    pub form_id: u32,
    /// Total span in bytes of this record (or GRUP) including its header,
    /// used by the converter to compute `groupSize` repairs after skipping.
    pub span: u64,
    pub is_grup: bool,
}

/// A single subrecord within a record's payload.
#[derive(Debug, Clone, Copy)]
pub struct SubrecordView<'a> {
    pub signature: [u8; 4],
    /// Offset of the subrecord's 6-byte header within the record payload.
    pub header_offset: usize,
    pub data: &'a [u8],
}

#[must_use]
pub fn signature_str(sig: &[u8; 4]) -> String {
    String::from_utf8_lossy(sig).into_owned()
}
