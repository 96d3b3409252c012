//! Read-only views computed from the stored record stream.

use serde::Serialize;
use std::collections::HashMap;

use crate::store::TranslationRecord;

/// How often a target language has been requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageUsage {
    pub language: String,
    pub count: usize,
}

/// Count records per language, most used first (ties by language code).
pub fn language_usage(records: &[TranslationRecord]) -> Vec<LanguageUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.language.as_str()).or_default() += 1;
    }

    let mut usage: Vec<_> = counts
        .into_iter()
        .map(|(language, count)| LanguageUsage {
            language: language.to_string(),
            count,
        })
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.language.cmp(&b.language)));
    usage
}

/// The newest `n` records. Input must already be newest-first.
pub fn recent(mut records: Vec<TranslationRecord>, n: usize) -> Vec<TranslationRecord> {
    records.truncate(n);
    records
}
