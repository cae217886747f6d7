use agua_models::chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Decides which calendar day "today" is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    timezone: Option<Tz>,
}

impl Clock {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// Calendar day of `now` in the configured zone, or in local time when none is set.
    pub fn date_at(&self, now: DateTime<Utc>) -> NaiveDate {
        match self.timezone {
            Some(tz) => now.with_timezone(&tz).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }
}
