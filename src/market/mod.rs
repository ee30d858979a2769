mod collect;
mod fallback;
mod parse;
mod record;
mod source;

pub use collect::load_snapshot;
pub use record::{InstrumentRecord, MarketSnapshot};
pub use source::DataSource;
