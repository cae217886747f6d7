use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_INTERVAL_HOURS: f64 = 1.0;
pub const DEFAULT_DAILY_GOAL: u32 = 8;
pub const MAX_DAILY_GOAL: u32 = 100;

/// One second. Shorter intervals are stretched to this.
pub const MIN_INTERVAL_HOURS: f64 = 1.0 / 3600.0;
/// Ten years. Longer intervals are clamped to this.
pub const MAX_INTERVAL_HOURS: f64 = 87_600.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme {:?}, expected \"light\" or \"dark\"", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_owned())),
        }
    }
}

/// The persisted settings record.
///
/// Deserialization never fails on field content: every missing or malformed
/// field falls back to its default, so an old or hand-edited record still
/// loads. Only the interval and daily goal are validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    #[serde(rename = "interval")]
    pub interval_hours: f64,
    pub theme: Theme,
    pub daily_goal: u32,
    pub user_name: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: DEFAULT_INTERVAL_HOURS,
            theme: Theme::default(),
            daily_goal: DEFAULT_DAILY_GOAL,
            user_name: String::new(),
        }
    }
}

impl NotificationSettings {
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(fields) => Self::from_fields(fields),
            None => {
                log::warn!("Settings record is not a JSON object, using defaults. [value = {value}]");
                Self::default()
            }
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let defaults = Self::default();

        let enabled = fields
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.enabled);

        let theme = fields
            .get("theme")
            .and_then(Value::as_str)
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.theme);

        let user_name = fields
            .get("userName")
            .and_then(Value::as_str)
            .map(|name| name.trim().to_owned())
            .unwrap_or(defaults.user_name);

        Self {
            enabled,
            interval_hours: parse_interval_hours(fields.get("interval")),
            theme,
            daily_goal: parse_daily_goal(fields.get("dailyGoal")),
            user_name,
        }
    }

    /// Period of the repeating reminder.
    pub fn interval(&self) -> Duration {
        interval_from_hours(normalize_interval_hours(self.interval_hours))
    }
}

impl<'de> Deserialize<'de> for NotificationSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Any positive finite number of hours is valid and kept within
/// [`MIN_INTERVAL_HOURS`, `MAX_INTERVAL_HOURS`]; anything else becomes the default.
pub fn normalize_interval_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours.clamp(MIN_INTERVAL_HOURS, MAX_INTERVAL_HOURS)
    } else {
        DEFAULT_INTERVAL_HOURS
    }
}

/// Saturates at the bounds instead of failing; callers pass normalized hours.
pub fn interval_from_hours(hours: f64) -> Duration {
    let secs = (hours * SECONDS_PER_HOUR).clamp(1.0, MAX_INTERVAL_HOURS * SECONDS_PER_HOUR);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::from_secs(1))
}

/// Zero means "no goal set" and falls back to the default.
pub fn normalize_daily_goal(goal: u32) -> u32 {
    match goal {
        0 => DEFAULT_DAILY_GOAL,
        goal => goal.min(MAX_DAILY_GOAL),
    }
}

fn parse_interval_hours(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(hours) if hours.is_finite() && hours > 0.0 => normalize_interval_hours(hours),
        _ => {
            if value.is_some() {
                log::warn!(
                    "Malformed notification interval, falling back to {DEFAULT_INTERVAL_HOURS}h. [value = {value:?}]"
                );
            }
            DEFAULT_INTERVAL_HOURS
        }
    }
}

fn parse_daily_goal(value: Option<&Value>) -> u32 {
    let goal = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|g| *g >= 0.0).map(|g| g.round() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match goal {
        Some(goal) => normalize_daily_goal(u32::try_from(goal).unwrap_or(MAX_DAILY_GOAL)),
        None => DEFAULT_DAILY_GOAL,
    }
}
