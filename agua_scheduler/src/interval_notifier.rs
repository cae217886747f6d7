use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use agua_models::{reminder::RepeatingReminder, settings::MAX_INTERVAL_HOURS};
use anyhow::Context;

use crate::{NotificationService, delivery::ReminderDeliveryChannel};

/// Shorter periods are stretched to this.
pub const MIN_REMINDER_PERIOD: Duration = Duration::from_secs(1);
/// Longer periods are clamped to this.
pub const MAX_REMINDER_PERIOD: Duration = Duration::from_secs(MAX_INTERVAL_HOURS as u64 * 3600);

struct ScheduledTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    async fn cancel(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task_handle.await {
            log::warn!("Reminder task ended abnormally. [error = {e}]");
        }
    }
}

/// Notification service running each repeating reminder as a tokio task.
pub struct IntervalNotificationService {
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
    tasks: Mutex<Vec<ScheduledTask>>,
    permission_granted: bool,
}

impl IntervalNotificationService {
    pub fn new(delivery_channel: Arc<dyn ReminderDeliveryChannel>) -> Self {
        Self {
            delivery_channel,
            tasks: Mutex::new(Vec::new()),
            permission_granted: true,
        }
    }

    pub fn with_permission(mut self, granted: bool) -> Self {
        self.permission_granted = granted;
        self
    }

    /// Reminders currently firing.
    pub async fn active_reminders(&self) -> usize {
        let tasks = self.tasks.lock().await;
        tasks.iter().filter(|t| !t.task_handle.is_finished()).count()
    }
}

#[async_trait]
impl NotificationService for IntervalNotificationService {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        Ok(self.permission_granted)
    }

    async fn cancel_all(&self) -> anyhow::Result<()> {
        let cancelled: Vec<ScheduledTask> = self.tasks.lock().await.drain(..).collect();
        let count = cancelled.len();
        for task in cancelled {
            task.cancel().await;
        }

        if count > 0 {
            log::info!("Cancelled {count} scheduled reminder(s)");
        }
        Ok(())
    }

    async fn schedule_repeating(&self, reminder: RepeatingReminder) -> anyhow::Result<()> {
        let cancellation_token = CancellationToken::new();
        let task_token = cancellation_token.child_token();
        let delivery_channel = Arc::clone(&self.delivery_channel);

        let every = reminder.every.clamp(MIN_REMINDER_PERIOD, MAX_REMINDER_PERIOD);
        let first_firing = Instant::now()
            .checked_add(every)
            .with_context(|| format!("Reminder period {every:?} is out of the timer's range"))?;

        log::info!("Scheduling reminder every {every:?}");
        let task_handle = tokio::spawn(async move {
            run_repeating(reminder, first_firing, every, delivery_channel.as_ref(), task_token).await
        });

        self.tasks.lock().await.push(ScheduledTask {
            task_handle,
            cancellation_token,
        });
        Ok(())
    }
}

async fn run_repeating(
    reminder: RepeatingReminder,
    first_firing: Instant,
    every: Duration,
    delivery: &dyn ReminderDeliveryChannel,
    cancellation_token: CancellationToken,
) {
    let mut ticker = time::interval_at(first_firing, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::debug!("Repeating reminder cancelled. [every = {every:?}]");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = delivery.deliver(&reminder.content).await {
                    log::warn!("Failed to deliver reminder. [error = {e}]");
                }
            }
        }
    }
}
