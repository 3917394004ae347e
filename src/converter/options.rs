//! Options accepted by [`crate::converter::convert`] (§6, §3.1).

use std::collections::HashSet;

/// Options controlling one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Emit per-record/per-GRUP `tracing` debug events while converting.
    pub verbose: bool,
    /// Abort on the first subrecord with no registry schema instead of
    /// applying the fallback policy (§4.6).
    pub strict_unknown: bool,
    /// Record-type signatures to omit entirely from the output (§4.5.1).
    pub skip_record_types: HashSet<[u8; 4]>,
    /// FormIds to omit entirely from the output (§4.5.1).
    pub skip_form_ids: HashSet<u32>,
}

impl ConvertOptions {
    #[must_use]
    pub fn has_skips(&self) -> bool {
        !self.skip_record_types.is_empty() || !self.skip_form_ids.is_empty()
    }

    #[must_use]
    pub fn should_skip(&self, signature: &[u8; 4], form_id: u32) -> bool {
        self.skip_record_types.contains(signature) || self.skip_form_ids.contains(&form_id)
    }
}
