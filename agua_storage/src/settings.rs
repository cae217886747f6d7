use std::sync::Arc;

use agua_models::settings::{
    NotificationSettings, Theme, normalize_daily_goal, normalize_interval_hours,
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{KeyValueStore, StorageError};

pub const SETTINGS_KEY: &str = "beberagua:notificationSettings";

/// Read-modify-write access to the persisted settings record.
///
/// Fields this version does not know about are carried over on every write.
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Persisted settings, or the defaults when nothing readable was stored.
    pub async fn get(&self) -> Result<NotificationSettings, StorageError> {
        let settings = match self.load_raw().await? {
            Some(value) => NotificationSettings::from_value(&value),
            None => NotificationSettings::default(),
        };
        log::debug!("Loaded settings {settings:?}");
        Ok(settings)
    }

    pub async fn save(&self, settings: &NotificationSettings) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.merge_and_store(settings).await
    }

    /// Applies `change` to the current settings, stores and returns the result.
    pub async fn update<F>(&self, change: F) -> Result<NotificationSettings, StorageError>
    where
        F: FnOnce(&mut NotificationSettings) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut settings = match self.load_raw().await? {
            Some(value) => NotificationSettings::from_value(&value),
            None => NotificationSettings::default(),
        };

        change(&mut settings);
        let settings = normalized(settings);
        self.merge_and_store(&settings).await?;

        log::info!("Settings updated {settings:?}");
        Ok(settings)
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<NotificationSettings, StorageError> {
        self.update(|s| s.enabled = enabled).await
    }

    /// Out-of-range values are normalized before they are stored.
    pub async fn set_interval_hours(&self, hours: f64) -> Result<NotificationSettings, StorageError> {
        self.update(|s| s.interval_hours = hours).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<NotificationSettings, StorageError> {
        self.update(|s| s.theme = theme).await
    }

    pub async fn set_daily_goal(&self, goal: u32) -> Result<NotificationSettings, StorageError> {
        self.update(|s| s.daily_goal = goal).await
    }

    pub async fn set_user_name(
        &self,
        name: impl Into<String>,
    ) -> Result<NotificationSettings, StorageError> {
        let name = name.into();
        self.update(move |s| s.user_name = name).await
    }

    async fn load_raw(&self) -> Result<Option<Value>, StorageError> {
        let Some(raw) = self.store.get(SETTINGS_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Stored settings are unreadable, using defaults. [error = {e}]");
                Ok(None)
            }
        }
    }

    async fn merge_and_store(&self, settings: &NotificationSettings) -> Result<(), StorageError> {
        let mut record = match self.load_raw().await? {
            Some(Value::Object(fields)) => fields,
            _ => Map::new(),
        };

        let encoded = serde_json::to_value(normalized(settings.clone()))
            .map_err(|e| StorageError::encode(SETTINGS_KEY, e))?;
        if let Value::Object(fields) = encoded {
            record.extend(fields);
        }

        let raw = serde_json::to_string(&Value::Object(record))
            .map_err(|e| StorageError::encode(SETTINGS_KEY, e))?;
        self.store.set(SETTINGS_KEY, raw).await.inspect_err(|e| {
            log::error!("Failed to persist settings. [error = {e}]");
        })
    }
}

fn normalized(mut settings: NotificationSettings) -> NotificationSettings {
    settings.interval_hours = normalize_interval_hours(settings.interval_hours);
    settings.daily_goal = normalize_daily_goal(settings.daily_goal);
    settings.user_name = settings.user_name.trim().to_owned();
    settings
}
