//! Running statistics and the fallback usage log (§2.1, §9).

use std::collections::BTreeMap;

use crate::schema::FallbackKind;

/// Key under which fallback usage is aggregated: append-only, counted,
/// never mutated except by incrementing — matching the corpus's
/// aggregated-log design note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FallbackKey {
    pub kind: FallbackKind,
    pub record_type: [u8; 4],
    pub sub_sig: [u8; 4],
    pub size: usize,
}

/// Counters accumulated over one conversion run.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub records_converted: u32,
    pub grups_converted: u32,
    pub subrecords_converted: u32,
    pub xxxx_sentinels: u32,
    pub compressed_passthrough: u32,
    pub records_skipped: u32,
    pub bytes_elided: u64,
    pub fallback_log: BTreeMap<FallbackKey, u32>,
}

impl Stats {
    pub fn record_fallback(&mut self, kind: FallbackKind, record_type: [u8; 4], sub_sig: [u8; 4], size: usize) {
        let key = FallbackKey {
            kind,
            record_type,
            sub_sig,
            size,
        };
        let first_seen = !self.fallback_log.contains_key(&key);
        *self.fallback_log.entry(key.clone()).or_insert(0) += 1;
        if first_seen {
            tracing::warn!(
                kind = %key.kind,
                record_type = %crate::model::signature_str(&key.record_type),
                sub_sig = %crate::model::signature_str(&key.sub_sig),
                size = key.size,
                "subrecord has no schema, using fallback"
            );
        }
    }

    /// Fallback usage sorted by count descending, for the post-conversion
    /// report (§9: "the reporting step sorts by count descending").
    #[must_use]
    pub fn fallback_report(&self) -> Vec<(&FallbackKey, u32)> {
        let mut entries: Vec<_> = self.fallback_log.iter().map(|(k, v)| (k, *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}
