use std::sync::Arc;

use tokio::sync::Mutex;

use agua_models::{
    reminder::{ReminderContent, ReminderState, RepeatingReminder},
    settings::{NotificationSettings, interval_from_hours, normalize_interval_hours},
};

use crate::NotificationService;

struct SchedulerState {
    reminder: ReminderState,
    permission_denied: bool,
}

/// Keeps exactly one repeating reminder in line with the current settings.
///
/// The scheduler never asks the notification service what is scheduled; its
/// cancel-then-schedule sequence is the source of truth.
pub struct ReminderScheduler {
    notifications: Arc<dyn NotificationService>,
    content: ReminderContent,
    state: Mutex<SchedulerState>,
}

impl ReminderScheduler {
    pub fn new(notifications: Arc<dyn NotificationService>, content: ReminderContent) -> Self {
        Self {
            notifications,
            content,
            state: Mutex::new(SchedulerState {
                reminder: ReminderState::NoReminderScheduled,
                permission_denied: false,
            }),
        }
    }

    /// Startup sequence: ask for permission, then apply `settings`.
    ///
    /// Never fails. A denied permission or a notification error only means no
    /// reminder is scheduled.
    pub async fn start(&self, settings: &NotificationSettings) -> ReminderState {
        let granted = match self.notifications.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                log::warn!("Could not request notification permission. [error = {e:#}]");
                false
            }
        };

        if !granted {
            log::warn!("Notification permission denied, reminders will not fire");
            self.state.lock().await.permission_denied = true;
            return ReminderState::NoReminderScheduled;
        }

        self.state.lock().await.permission_denied = false;
        match self.apply_settings(settings).await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to schedule reminder on startup. [error = {e:#}]");
                ReminderState::NoReminderScheduled
            }
        }
    }

    /// Replaces whatever was scheduled with a reminder matching `settings`.
    pub async fn apply_settings(
        &self,
        settings: &NotificationSettings,
    ) -> anyhow::Result<ReminderState> {
        let mut state = self.state.lock().await;

        self.notifications.cancel_all().await?;
        state.reminder = ReminderState::NoReminderScheduled;

        if !settings.enabled {
            log::info!("Reminders disabled");
            return Ok(state.reminder);
        }

        if state.permission_denied {
            log::warn!("Reminders enabled but notification permission was denied, skipping");
            return Ok(state.reminder);
        }

        let interval_hours = normalize_interval_hours(settings.interval_hours);
        self.notifications
            .schedule_repeating(RepeatingReminder {
                content: self.content.clone(),
                every: interval_from_hours(interval_hours),
            })
            .await?;
        state.reminder = ReminderState::ReminderScheduled { interval_hours };

        log::info!("Reminder scheduled every {interval_hours}h");
        Ok(state.reminder)
    }

    pub async fn state(&self) -> ReminderState {
        self.state.lock().await.reminder
    }
}

#[cfg(test)]
mod tests;
