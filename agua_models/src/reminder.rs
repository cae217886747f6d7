use std::time::Duration;

pub const DEFAULT_REMINDER_TITLE: &str = "Time to drink water! 💧";
pub const DEFAULT_REMINDER_BODY: &str = "Stay hydrated! How about a glass of water right now?";

/// What the reminder says. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderContent {
    pub title: String,
    pub body: String,
}

impl Default for ReminderContent {
    fn default() -> Self {
        Self {
            title: DEFAULT_REMINDER_TITLE.to_owned(),
            body: DEFAULT_REMINDER_BODY.to_owned(),
        }
    }
}

/// A reminder that fires every `every`, first firing one period after it is scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingReminder {
    pub content: ReminderContent,
    pub every: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReminderState {
    #[default]
    NoReminderScheduled,
    ReminderScheduled { interval_hours: f64 },
}
