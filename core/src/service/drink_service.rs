use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::model::record::{DrinkDraft, DrinkField, DrinkRecord};
use crate::model::shops::ShopRegistry;
use crate::model::stats::{CalendarMonth, Frequency, MonthlyStats, Scope, ScopeSummary};
use crate::repository::KeyValueStore;
use crate::service::stats_service;

/// Storage keys of the two persisted collections.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreKeys {
    pub records: String,
    pub shops: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            records: crate::config::RECORDS_KEY.to_string(),
            shops: crate::config::SHOPS_KEY.to_string(),
        }
    }
}

impl From<&Config> for StoreKeys {
    fn from(config: &Config) -> Self {
        Self {
            records: config.records_key.clone(),
            shops: config.shops_key.clone(),
        }
    }
}

/// Owns the drink records and the shop registry for one session.
///
/// The in-memory collections are the source of truth. Every mutation is
/// applied in memory first and then written through to the store as a full
/// snapshot; a failed write is returned to the caller and never rolls back
/// the in-memory state.
pub struct DrinkService<S: KeyValueStore> {
    store: S,
    keys: StoreKeys,
    records: Vec<DrinkRecord>,
    shops: ShopRegistry,
}

impl<S: KeyValueStore> DrinkService<S> {
    /// Reads both collections. Anything unreadable counts as "no prior data".
    pub fn load(store: S, keys: StoreKeys) -> Self {
        let records: Vec<DrinkRecord> = read_entry(&store, &keys.records).unwrap_or_default();
        let shops = read_entry::<Vec<String>, _>(&store, &keys.shops)
            .map(ShopRegistry::from_saved)
            .unwrap_or_else(ShopRegistry::seeded);

        debug!(records = records.len(), shops = shops.len(), "loaded drink log");
        Self {
            store,
            keys,
            records,
            shops,
        }
    }

    pub fn records(&self) -> &[DrinkRecord] {
        &self.records
    }

    pub fn shops(&self) -> &[String] {
        self.shops.names()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Logs a drink on `selected_date`.
    ///
    /// Returns `Ok(None)` and changes nothing when no day is selected or the
    /// draft lacks a shop or item.
    pub fn add(&mut self, draft: DrinkDraft, selected_date: Option<NaiveDate>) -> Result<Option<DrinkRecord>> {
        let Some(date) = selected_date else {
            debug!("add skipped: no date selected");
            return Ok(None);
        };
        if !draft.is_complete() {
            debug!("add skipped: shop or item missing");
            return Ok(None);
        }

        let record = draft.into_record(date);
        let new_shop = self.shops.register(&record.shop);
        self.records.push(record.clone());
        info!(id = %record.id, date = %record.date, shop = %record.shop, "added drink");

        // Both snapshots are attempted; the first failure is reported.
        let saved_records = self.persist_records();
        let saved_shops = if new_shop { self.persist_shops() } else { Ok(()) };
        saved_records.and(saved_shops)?;
        Ok(Some(record))
    }

    /// Deletes the record with `id`. Unknown ids are not an error.
    pub fn remove(&mut self, id: &Uuid) -> Result<bool> {
        let initial_len = self.records.len();
        self.records.retain(|r| r.id != *id);
        let removed = self.records.len() != initial_len;
        if removed {
            info!(%id, "removed drink");
        } else {
            debug!(%id, "remove: no such record");
        }

        self.persist_records()?;
        Ok(removed)
    }

    pub fn register_shop(&mut self, name: &str) -> Result<bool> {
        let grew = self.shops.register(name);
        if grew {
            self.persist_shops()?;
        }
        Ok(grew)
    }

    pub fn records_on(&self, date: NaiveDate) -> Vec<&DrinkRecord> {
        stats_service::records_on(&self.records, date)
    }

    pub fn stats(&self, year: i32, month: u32) -> MonthlyStats {
        stats_service::stats_for(&self.records, year, month)
    }

    pub fn favorite(&self, field: DrinkField) -> Frequency {
        stats_service::top_frequency(&self.records, field)
    }

    pub fn ranking(&self, field: DrinkField) -> Vec<Frequency> {
        stats_service::all_frequencies(&self.records, field)
    }

    pub fn summarize(&self, scope: Scope) -> ScopeSummary {
        stats_service::summarize_scope(&self.records, scope)
    }

    pub fn calendar(&self, year: i32, month: u32) -> CalendarMonth {
        stats_service::month_calendar(&self.records, year, month)
    }

    /// The nag for adding `draft` on `date`, given what is already logged there.
    pub fn sugar_warning(&self, draft: &DrinkDraft, date: NaiveDate) -> Option<&'static str> {
        draft.sugar_warning(self.records_on(date).len())
    }

    /// Finds the record whose id is `input` or uniquely starts with it.
    pub fn resolve_id(&self, input: &str) -> Result<Uuid> {
        let needle = input.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }

        let matches: Vec<Uuid> = self
            .records
            .iter()
            .map(|r| r.id)
            .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
            .collect();

        match matches.len() {
            1 => Ok(matches[0]),
            0 => Err(anyhow!("No drink with id '{}'", input)),
            n => Err(anyhow!("Ambiguous id '{}' matches {} drinks", input, n)),
        }
    }

    fn persist_records(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.store
            .set(&self.keys.records, &json)
            .with_context(|| format!("Failed to save {} drinks", self.records.len()))
    }

    fn persist_shops(&self) -> Result<()> {
        let json = serde_json::to_string(&self.shops)?;
        self.store
            .set(&self.keys.shops, &json)
            .context("Failed to save shop list")
    }
}

fn read_entry<T: DeserializeOwned, S: KeyValueStore>(store: &S, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read store entry, starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "store entry is not valid JSON, starting empty");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;
    use crate::model::record::Sweetness;
    use crate::model::shops::DEFAULT_SHOPS;
    use crate::repository::MemoryKeyValueStore;

    fn day(key: &str) -> NaiveDate {
        date::decode(key).unwrap()
    }

    fn service() -> DrinkService<MemoryKeyValueStore> {
        DrinkService::load(MemoryKeyValueStore::new(), StoreKeys::default())
    }

    #[test]
    fn test_first_use_seeds_default_shops() {
        let service = service();
        assert!(service.records().is_empty());
        assert_eq!(service.shops(), DEFAULT_SHOPS.map(String::from).as_slice());
    }

    #[test]
    fn test_add_then_query_by_date() {
        let mut service = service();
        let record = service
            .add(DrinkDraft::new("50嵐", "四季春").with_price(35.0), Some(day("2026-01-05")))
            .unwrap()
            .expect("record added");

        let found = service.records_on(day("2026-01-05"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, record.id);
        assert_eq!(found[0].date, day("2026-01-05"));
        assert!(service.records_on(day("2026-01-06")).is_empty());
    }

    #[test]
    fn test_add_without_date_or_fields_is_skipped() {
        let mut service = service();
        assert_eq!(service.add(DrinkDraft::new("A", "B"), None).unwrap(), None);
        assert_eq!(service.add(DrinkDraft::new("", "B"), Some(day("2026-01-05"))).unwrap(), None);
        assert_eq!(service.add(DrinkDraft::new("A", ""), Some(day("2026-01-05"))).unwrap(), None);
        assert!(service.records().is_empty());
        assert_eq!(service.store().raw(crate::config::RECORDS_KEY), None);
    }

    #[test]
    fn test_add_registers_unseen_shop_at_end() {
        let mut service = service();
        service.add(DrinkDraft::new("50嵐", "x"), Some(day("2026-01-05"))).unwrap();
        assert_eq!(service.shops().len(), DEFAULT_SHOPS.len());

        service.add(DrinkDraft::new("可不可", "x"), Some(day("2026-01-05"))).unwrap();
        assert_eq!(service.shops().len(), DEFAULT_SHOPS.len() + 1);
        assert_eq!(service.shops().last().map(String::as_str), Some("可不可"));
        assert_eq!(&service.shops()[..DEFAULT_SHOPS.len()], DEFAULT_SHOPS.map(String::from).as_slice());

        let saved: Vec<String> =
            serde_json::from_str(&service.store().raw(crate::config::SHOPS_KEY).unwrap()).unwrap();
        assert_eq!(saved, service.shops());
    }

    #[test]
    fn test_remove_is_permanent_and_unknown_id_is_noop() {
        let mut service = service();
        let kept = service.add(DrinkDraft::new("A", "x"), Some(day("2026-01-05"))).unwrap().unwrap();
        let gone = service.add(DrinkDraft::new("B", "y"), Some(day("2026-01-05"))).unwrap().unwrap();

        assert!(service.remove(&gone.id).unwrap());
        assert!(!service.remove(&gone.id).unwrap());
        assert!(!service.remove(&Uuid::new_v4()).unwrap());

        assert_eq!(service.records().len(), 1);
        assert_eq!(service.records()[0].id, kept.id);
        assert!(service.records_on(day("2026-01-05")).iter().all(|r| r.id != gone.id));
    }

    #[test]
    fn test_state_survives_reload() {
        let store = MemoryKeyValueStore::new();
        {
            let mut service = DrinkService::load(&store, StoreKeys::default());
            service.add(DrinkDraft::new("新店", "x").with_price(60.0), Some(day("2026-02-01"))).unwrap();
        }

        let reloaded = DrinkService::load(&store, StoreKeys::default());
        assert_eq!(reloaded.records().len(), 1);
        assert_eq!(reloaded.records()[0].price, 60.0);
        assert!(reloaded.shops().iter().any(|s| s == "新店"));
    }

    #[test]
    fn test_unreadable_state_falls_back_to_defaults() {
        let store = MemoryKeyValueStore::new()
            .with_entry(crate::config::RECORDS_KEY, "not json")
            .with_entry(crate::config::SHOPS_KEY, "{}");
        let service = DrinkService::load(store, StoreKeys::default());
        assert!(service.records().is_empty());
        assert_eq!(service.shops().len(), DEFAULT_SHOPS.len());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let mut service = DrinkService::load(MemoryKeyValueStore::new().read_only(), StoreKeys::default());

        let result = service.add(DrinkDraft::new("A", "x"), Some(day("2026-01-05")));
        assert!(result.is_err());
        assert_eq!(service.records().len(), 1);
        assert!(service.shops().iter().any(|s| s == "A"));

        let id = service.records()[0].id;
        assert!(service.remove(&id).is_err());
        assert!(service.records().is_empty());
    }

    #[test]
    fn test_failed_shop_write_still_saves_records() {
        let store = MemoryKeyValueStore::new().failing_on(crate::config::SHOPS_KEY);
        let mut service = DrinkService::load(&store, StoreKeys::default());

        let result = service.add(DrinkDraft::new("可不可", "熟成紅茶"), Some(day("2026-01-05")));
        assert!(result.is_err());
        assert!(store.raw(crate::config::RECORDS_KEY).is_some());
        assert_eq!(store.raw(crate::config::SHOPS_KEY), None);

        let reloaded = DrinkService::load(&store, StoreKeys::default());
        assert_eq!(reloaded.records().len(), 1);
        assert_eq!(reloaded.records()[0].shop, "可不可");
    }

    #[test]
    fn test_register_shop_persists_only_growth() {
        let mut service = service();
        assert!(!service.register_shop("50嵐").unwrap());
        assert_eq!(service.store().raw(crate::config::SHOPS_KEY), None);

        assert!(service.register_shop("龜記").unwrap());
        let saved: Vec<String> =
            serde_json::from_str(&service.store().raw(crate::config::SHOPS_KEY).unwrap()).unwrap();
        assert_eq!(saved.last().map(String::as_str), Some("龜記"));
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let mut service = service();
        let record = service.add(DrinkDraft::new("A", "x"), Some(day("2026-01-05"))).unwrap().unwrap();
        let full = record.id.to_string();

        assert_eq!(service.resolve_id(&full).unwrap(), record.id);
        assert_eq!(service.resolve_id(&full[..8]).unwrap(), record.id);
        assert!(service.resolve_id("zzzz").is_err());
        assert!(service.resolve_id("").is_err());
    }

    #[test]
    fn test_sugar_warning_considers_existing_drinks() {
        let mut service = service();
        let draft = DrinkDraft::new("A", "x");
        assert!(service.sugar_warning(&draft, day("2026-01-05")).is_some());

        service.add(draft.clone(), Some(day("2026-01-05"))).unwrap();
        assert!(service.sugar_warning(&draft, day("2026-01-05")).is_none());

        let plain = DrinkDraft {
            sweetness: Sweetness::SugarFree,
            ..draft
        };
        assert!(service.sugar_warning(&plain, day("2026-01-06")).is_none());
    }
}
