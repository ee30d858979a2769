use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::market::InstrumentRecord;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// Records whose ticker or name contains `query` (ignoring case), in their
/// original order. Only when nothing contains it do fuzzy matches count.
/// A blank query keeps everything.
pub(super) fn filter_records(records: &[InstrumentRecord], query: &str) -> Vec<InstrumentRecord> {
    let query = query.trim();
    if query.is_empty() {
        return records.to_vec();
    }

    let needle = query.to_lowercase();
    let exact = records
        .iter()
        .filter(|record| {
            contains_ignore_case(&record.id, &needle)
                || contains_ignore_case(&record.display_name, &needle)
        })
        .cloned()
        .collect::<Vec<_>>();
    if !exact.is_empty() {
        return exact;
    }

    let matcher = SkimMatcherV2::default();
    records
        .iter()
        .filter(|record| {
            fuzzy_match_score(&matcher, &record.id, query).is_some()
                || fuzzy_match_score(&matcher, &record.display_name, query).is_some()
        })
        .cloned()
        .collect()
}
