use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::fallback::{TARGET_RECORD_COUNT, fallback_records};
use super::record::InstrumentRecord;

#[derive(Debug)]
pub(super) struct ParsedPayload {
    pub(super) records: Vec<InstrumentRecord>,
    pub(super) sources: Vec<String>,
}

pub(super) fn parse_market_payload(raw: &str) -> Result<ParsedPayload> {
    let cleaned = strip_code_fences(raw);

    if cleaned.starts_with('{') {
        let parsed: Value =
            serde_json::from_str(&cleaned).context("invalid JSON envelope in market payload")?;
        let object = parsed
            .as_object()
            .ok_or_else(|| anyhow!("unexpected JSON type in market payload"))?;
        let items = object
            .get("data")
            .or_else(|| object.get("records"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("market payload envelope has no data array"))?;
        let sources = object
            .get("sources")
            .and_then(Value::as_array)
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|uri| !uri.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        return Ok(ParsedPayload {
            records: normalize_records(valid_records(items)),
            sources,
        });
    }

    let array_text = extract_json_array(&cleaned)?;
    let parsed: Value =
        serde_json::from_str(array_text).context("invalid JSON array in market payload")?;
    let items = parsed
        .as_array()
        .ok_or_else(|| anyhow!("parsed market payload is not an array"))?;

    Ok(ParsedPayload {
        records: normalize_records(valid_records(items)),
        sources: Vec::new(),
    })
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_owned()
}

fn extract_json_array(text: &str) -> Result<&str> {
    match (text.find('['), text.rfind(']')) {
        (Some(first), Some(last)) if first < last => Ok(&text[first..=last]),
        _ => Err(anyhow!("no JSON array structure found in market payload")),
    }
}

/// Well-formed items only; a ticker seen earlier (ignoring case) drops the later item.
fn valid_records(items: &[Value]) -> Vec<InstrumentRecord> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| InstrumentRecord::deserialize(item).ok())
        .filter(|record| !record.id.is_empty() && record.price.is_finite() && record.price > 0.0)
        .filter(|record| seen.insert(record.id.to_uppercase()))
        .collect()
}

pub(super) fn normalize_records(mut records: Vec<InstrumentRecord>) -> Vec<InstrumentRecord> {
    records.truncate(TARGET_RECORD_COUNT);

    if records.len() < TARGET_RECORD_COUNT {
        let needed = TARGET_RECORD_COUNT - records.len();
        let existing = records
            .iter()
            .map(|record| record.id.to_uppercase())
            .collect::<HashSet<_>>();
        let supplements = fallback_records()
            .into_iter()
            .filter(|record| !existing.contains(&record.id.to_uppercase()))
            .take(needed);
        records.extend(supplements);
    }

    records
}
