pub mod config;
pub mod date;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;

pub use config::Config;
pub use date::{decode, encode, parse_human_date, DateKeyError};
pub use input::{parse_draft, ParsedDraft};
pub use model::record::{coerce_price, DrinkDraft, DrinkField, DrinkRecord, IceLevel, Sweetness};
pub use model::shops::ShopRegistry;
pub use model::stats::{CalendarMonth, DayMarker, Frequency, MonthlyStats, Scope, ScopeSummary, NO_DATA};
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use service::drink_service::{DrinkService, StoreKeys};

/// Opens the file-backed drink log described by `config`.
pub fn open(config: &Config) -> anyhow::Result<DrinkService<FileKeyValueStore>> {
    let store = FileKeyValueStore::new(config.data_dir.clone())?;
    Ok(DrinkService::load(store, StoreKeys::from(config)))
}
