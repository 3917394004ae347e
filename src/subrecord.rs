//! Subrecord stream parsing within a record payload (§4.3).
//!
//! The `XXXX` sentinel overrides the declared 16-bit size of the
//! subrecord that immediately follows it. `SubrecordIter` hides that
//! bookkeeping from callers: it never yields an `XXXX` entry itself.

use crate::binary::{read_u16_be, read_u16_le, read_u32_be, read_u32_le};
use crate::error::{Error, Result};
use crate::model::SubrecordView;

pub const XXXX_SIGNATURE: [u8; 4] = *b"XXXX";
const HEADER_SIZE: usize = 6;

/// Restartable, non-copying iterator over the subrecords of a decompressed
/// record payload.
pub struct SubrecordIter<'a> {
    payload: &'a [u8],
    pos: usize,
    big_endian: bool,
    size_override: Option<u32>,
    record_offset: u64,
    failed: bool,
}

/// Iterates the subrecords of a record payload (§6 core API surface).
/// `record_offset` is only used to annotate errors with a file offset.
#[must_use]
pub fn parse_subrecords(payload: &[u8], big_endian: bool, record_offset: u64) -> SubrecordIter<'_> {
    SubrecordIter::new(payload, big_endian, record_offset)
}

impl<'a> SubrecordIter<'a> {
    #[must_use]
    pub fn new(payload: &'a [u8], big_endian: bool, record_offset: u64) -> Self {
        Self {
            payload,
            pos: 0,
            big_endian,
            size_override: None,
            record_offset,
            failed: false,
        }
    }

    fn read_u16(&self, offset: usize) -> Result<u16> {
        if self.big_endian {
            read_u16_be(self.payload, offset)
        } else {
            read_u16_le(self.payload, offset)
        }
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        if self.big_endian {
            read_u32_be(self.payload, offset)
        } else {
            read_u32_le(self.payload, offset)
        }
    }
}

impl<'a> Iterator for SubrecordIter<'a> {
    type Item = Result<SubrecordView<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let remaining = self.payload.len() - self.pos;
            if remaining == 0 {
                return None;
            }
            if remaining < HEADER_SIZE {
                self.failed = true;
                return Some(Err(Error::RaggedPayload {
                    record_offset: self.record_offset,
                    remainder: remaining,
                }));
            }

            let header_offset = self.pos;
            let mut signature = [0u8; 4];
            signature.copy_from_slice(&self.payload[header_offset..header_offset + 4]);
            let declared_size = match self.read_u16(header_offset + 4) {
                Ok(v) => v,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            if signature == XXXX_SIGNATURE {
                let override_offset = header_offset + HEADER_SIZE;
                let override_value = match self.read_u32(override_offset) {
                    Ok(v) => v,
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                };
                self.size_override = Some(override_value);
                self.pos = override_offset + 4;
                continue;
            }

            let size = self.size_override.take().unwrap_or(u32::from(declared_size)) as usize;
            let data_start = header_offset + HEADER_SIZE;
            let data_end = data_start + size;
            if data_end > self.payload.len() {
                self.failed = true;
                return Some(Err(Error::Truncated {
                    what: "subrecord payload",
                    offset: self.record_offset + data_start as u64,
                    len: self.payload.len(),
                }));
            }

            self.pos = data_end;
            return Some(Ok(SubrecordView {
                signature,
                header_offset,
                data: &self.payload[data_start..data_end],
            }));
        }
    }
}
