use std::sync::Arc;

use agua_models::{
    chrono::NaiveDate,
    daily_record::{DailyRecord, DayKey, sort_most_recent_first},
};
use tokio::sync::Mutex;

use crate::{KeyValueStore, StorageError};

pub const LEDGER_KEY: &str = "waterHistory";

/// Per-day glass counts persisted under [`LEDGER_KEY`].
///
/// Nothing is cached: every operation loads the full ledger, works on it and
/// writes it back. Writers are serialized through an internal lock, so share a
/// single ledger (e.g. behind an `Arc`) between every caller that mutates the
/// same store.
pub struct ConsumptionLedger {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl ConsumptionLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Logs one glass for `today` and returns the day's new count.
    pub async fn record_glass(&self, today: NaiveDate) -> Result<u32, StorageError> {
        let _guard = self.write_lock.lock().await;
        let day = DayKey::from(today);
        let mut records = self.load().await?;

        let count = match records.iter_mut().find(|r| r.date == day) {
            Some(record) => {
                record.count = record.count.saturating_add(1);
                record.count
            }
            None => {
                records.push(DailyRecord::first_glass(day));
                1
            }
        };

        self.persist(&records).await?;
        log::info!("Recorded glass. [date = {day}, count = {count}]");

        Ok(count)
    }

    pub async fn today_count(&self, today: NaiveDate) -> Result<u32, StorageError> {
        let day = DayKey::from(today);
        let count = self
            .load()
            .await?
            .into_iter()
            .find(|r| r.date == day)
            .map_or(0, |r| r.count);

        log::debug!("Loaded today's count. [date = {day}, count = {count}]");
        Ok(count)
    }

    /// Every record, most recent day first.
    pub async fn history(&self) -> Result<Vec<DailyRecord>, StorageError> {
        let mut records = self.load().await?;
        sort_most_recent_first(&mut records);
        log::debug!("Loaded history. [days = {}]", records.len());
        Ok(records)
    }

    pub async fn clear_history(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(LEDGER_KEY).await.inspect_err(|e| {
            log::error!("Failed to clear history. [error = {e}]");
        })?;
        log::info!("History cleared");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<DailyRecord>, StorageError> {
        let Some(raw) = self.store.get(LEDGER_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<DailyRecord>>(&raw) {
            Ok(records) => Ok(merge_duplicate_days(records)),
            Err(e) => {
                log::warn!("Stored history is unreadable, treating it as empty. [error = {e}]");
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, records: &[DailyRecord]) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(records).map_err(|e| StorageError::encode(LEDGER_KEY, e))?;

        self.store.set(LEDGER_KEY, raw).await.inspect_err(|e| {
            log::error!("Failed to persist history. [error = {e}]");
        })
    }
}

/// Folds records sharing a day into the first one, keeping the stored order.
fn merge_duplicate_days(records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    let mut merged: Vec<DailyRecord> = Vec::with_capacity(records.len());
    for record in records {
        match merged.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => existing.count = existing.count.saturating_add(record.count),
            None => merged.push(record),
        }
    }
    merged
}
