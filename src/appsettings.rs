use std::path::PathBuf;

use agua_models::reminder::{DEFAULT_REMINDER_BODY, DEFAULT_REMINDER_TITLE, ReminderContent};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("agua-store.json"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NotificationSettings {
    pub title: String,
    pub body: String,
    /// How often `run` re-reads the stored settings to pick up changes.
    pub settings_poll_secs: u64,
    /// Answer given when `run` asks for notification permission.
    pub permission_granted: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_REMINDER_TITLE.to_owned(),
            body: DEFAULT_REMINDER_BODY.to_owned(),
            settings_poll_secs: 5,
            permission_granted: true,
        }
    }
}

impl NotificationSettings {
    pub fn content(&self) -> ReminderContent {
        ReminderContent {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClockSettings {
    pub timezone: Option<chrono_tz::Tz>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub notification: NotificationSettings,
    #[serde(default)]
    pub clock: ClockSettings,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
