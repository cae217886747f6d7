pub mod daily_record;
pub mod progress;
pub mod reminder;
pub mod settings;
pub mod tips;

pub use chrono;
