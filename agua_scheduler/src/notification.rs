use async_trait::async_trait;

use agua_models::reminder::RepeatingReminder;

/// The device notification primitives the scheduler drives.
#[async_trait]
pub trait NotificationService: Send + Sync + 'static {
    /// Whether reminders may be shown at all.
    async fn request_permission(&self) -> anyhow::Result<bool>;

    async fn cancel_all(&self) -> anyhow::Result<()>;

    async fn schedule_repeating(&self, reminder: RepeatingReminder) -> anyhow::Result<()>;
}
