use super::record::{InstrumentRecord, MarketSnapshot};

pub(super) const TARGET_RECORD_COUNT: usize = 12;

const FALLBACK_ROWS: [(&str, &str, f64, f64); TARGET_RECORD_COUNT] = [
    ("VALE3", "Vale", 60.50, -1.2),
    ("PETR4", "Petrobras", 36.20, 0.8),
    ("ITUB4", "Itaú Unibanco", 34.10, 1.5),
    ("BBDC4", "Bradesco", 13.80, -0.5),
    ("BBAS3", "Banco do Brasil", 27.90, 2.1),
    ("ABEV3", "Ambev", 12.50, 0.3),
    ("WEGE3", "WEG", 38.40, 1.8),
    ("SUZB3", "Suzano", 54.20, -0.9),
    ("BPAC11", "BTG Pactual", 36.50, 1.2),
    ("ELET3", "Eletrobras", 42.10, -1.5),
    ("RENT3", "Localiza", 51.80, 2.5),
    ("JBSS3", "JBS", 22.40, 0.7),
];

pub(super) fn fallback_records() -> Vec<InstrumentRecord> {
    FALLBACK_ROWS
        .iter()
        .map(|&(ticker, name, price, change)| InstrumentRecord::new(ticker, name, price, change))
        .collect()
}

pub(super) fn fallback_snapshot(reason: &str) -> MarketSnapshot {
    MarketSnapshot {
        records: fallback_records(),
        sources: vec![reason.to_owned()],
    }
}
