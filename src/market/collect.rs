use anyhow::{Context, Result};

use super::fallback::fallback_snapshot;
use super::parse::parse_market_payload;
use super::record::MarketSnapshot;
use super::source::{DataSource, read_raw};

const NO_SOURCE_LABEL: &str = "Simulation Mode (no data source)";
const LOAD_ERROR_LABEL: &str = "Fallback (load error)";

/// Loads one snapshot from `source`. Never fails: any read or parse error is
/// logged and the built-in dataset is returned instead.
pub fn load_snapshot(source: &DataSource) -> MarketSnapshot {
    match try_load(source) {
        Ok(Some(snapshot)) => {
            log::info!(
                "loaded {} instruments from {}",
                snapshot.records.len(),
                source.label()
            );
            snapshot
        }
        Ok(None) => {
            log::warn!("no market data source configured, using fallback dataset");
            fallback_snapshot(NO_SOURCE_LABEL)
        }
        Err(error) => {
            log::error!("failed to load market data from {}: {error:#}", source.label());
            fallback_snapshot(LOAD_ERROR_LABEL)
        }
    }
}

fn try_load(source: &DataSource) -> Result<Option<MarketSnapshot>> {
    let Some(raw) = read_raw(source)? else {
        return Ok(None);
    };

    let parsed = parse_market_payload(&raw)
        .with_context(|| format!("failed to parse market data from {}", source.label()))?;

    Ok(Some(MarketSnapshot {
        records: parsed.records,
        sources: parsed.sources,
    }))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn fallback_source_yields_builtin_dataset() {
        let snapshot = load_snapshot(&DataSource::Fallback);

        assert_eq!(snapshot.records.len(), 12);
        assert_eq!(snapshot.records[0].id, "VALE3");
        assert_eq!(snapshot.sources, vec![NO_SOURCE_LABEL.to_owned()]);
    }

    #[test]
    fn unreadable_source_falls_back() {
        let snapshot = load_snapshot(&DataSource::File(PathBuf::from("/nope/market.json")));

        assert!(!snapshot.records.is_empty());
        assert_eq!(snapshot.sources, vec![LOAD_ERROR_LABEL.to_owned()]);
    }

    #[test]
    fn garbage_payload_falls_back() {
        let snapshot = load_snapshot(&DataSource::Command("echo not json".to_owned()));

        assert_eq!(snapshot.records.len(), 12);
        assert_eq!(snapshot.sources, vec![LOAD_ERROR_LABEL.to_owned()]);
    }

    #[test]
    fn command_payload_is_used() {
        let command = r#"printf '%s' '{"data":[{"ticker":"MGLU3","name":"Magalu","price":9.9,"changePercent":-4.2}],"sources":["https://b3.com.br"]}'"#;
        let snapshot = load_snapshot(&DataSource::Command(command.to_owned()));

        assert_eq!(snapshot.records[0].id, "MGLU3");
        assert_eq!(snapshot.records.len(), 12);
        assert_eq!(snapshot.sources, vec!["https://b3.com.br".to_owned()]);
    }
}
