mod error;
mod file_store;
mod key_value;
mod ledger;
mod settings;

pub use error::StorageError;
pub use file_store::FileKeyValueStore;
pub use key_value::{InMemoryKeyValueStore, KeyValueStore};
pub use ledger::{ConsumptionLedger, LEDGER_KEY};
pub use settings::{SETTINGS_KEY, SettingsRepository};
