use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InstrumentRecord {
    #[serde(rename = "ticker")]
    pub id: String,
    #[serde(default, rename = "name", deserialize_with = "null_as_default")]
    pub display_name: String,
    pub price: f64,
    #[serde(default, rename = "changePercent", deserialize_with = "null_as_default")]
    pub change_percent: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl InstrumentRecord {
    pub fn new(id: &str, display_name: &str, price: f64, change_percent: f64) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            price,
            change_percent,
        }
    }

    pub fn is_gain(&self) -> bool {
        self.change_percent >= 0.0
    }
}

#[derive(Clone, Debug)]
pub struct MarketSnapshot {
    pub records: Vec<InstrumentRecord>,
    pub sources: Vec<String>,
}
