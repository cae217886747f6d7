use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Day/month/year, the format the ledger has always been persisted with.
pub const DAY_KEY_FORMAT: &str = "%d/%m/%Y";

/// Calendar day a [`DailyRecord`] is bucketed under.
///
/// Ordering follows the calendar, not the textual representation, so
/// `02/01/2024` sorts after `31/12/2023`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT).map(Self)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|e| de::Error::custom(format!("invalid day key {raw:?}: {e}")))
    }
}

/// Glasses logged on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: DayKey,
    pub count: u32,
}

impl DailyRecord {
    pub fn first_glass(date: DayKey) -> Self {
        Self { date, count: 1 }
    }
}

/// Most recent day first.
pub fn sort_most_recent_first(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn day_key_is_zero_padded_day_month_year() {
        assert_eq!(day(2024, 3, 1).to_string(), "01/03/2024");
        assert_eq!(day(2023, 12, 31).to_string(), "31/12/2023");
    }

    #[test]
    fn day_key_parses_unpadded_input() {
        let parsed: DayKey = "1/3/2024".parse().unwrap();
        assert_eq!(parsed, day(2024, 3, 1));
    }

    #[test]
    fn day_key_rejects_month_first_garbage() {
        assert!("03/31/2024".parse::<DayKey>().is_err());
        assert!("yesterday".parse::<DayKey>().is_err());
    }

    #[test]
    fn record_json_uses_plain_date_string() {
        let record = DailyRecord {
            date: day(2024, 3, 2),
            count: 4,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "date": "02/03/2024", "count": 4 }));
    }

    #[test]
    fn record_with_bad_date_fails_to_deserialize() {
        let json = serde_json::json!({ "date": "2024-03-02", "count": 1 });
        assert!(serde_json::from_value::<DailyRecord>(json).is_err());
    }

    #[test]
    fn sorting_is_chronological_not_lexical() {
        let mut records = vec![
            DailyRecord { date: day(2023, 12, 31), count: 2 },
            DailyRecord { date: day(2024, 1, 2), count: 1 },
            DailyRecord { date: day(2024, 1, 10), count: 5 },
        ];
        sort_most_recent_first(&mut records);

        let dates: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["10/01/2024", "02/01/2024", "31/12/2023"]);
    }

    proptest! {
        #[test]
        fn day_key_text_reads_back_as_same_day(offset in 0i64..365 * 130) {
            let base = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let key = DayKey::new(base + chrono::Days::new(offset as u64));

            let text = key.to_string();
            prop_assert_eq!(text.len(), 10);
            prop_assert_eq!(text.parse::<DayKey>().unwrap(), key);
        }
    }
}
