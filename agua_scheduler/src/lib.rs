pub mod delivery;
mod interval_notifier;
mod notification;
mod reminder_scheduler;

pub use interval_notifier::{IntervalNotificationService, MAX_REMINDER_PERIOD, MIN_REMINDER_PERIOD};
pub use notification::NotificationService;
pub use reminder_scheduler::ReminderScheduler;
