use async_trait::async_trait;
use thiserror::Error;

use agua_models::reminder::ReminderContent;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Common(#[from] anyhow::Error),

    #[error("Desktop notification failed: {0}")]
    Desktop(String),
}

/// Where a fired reminder ends up.
#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn deliver(&self, content: &ReminderContent) -> Result<(), DeliveryError>;
}

pub struct LogDeliveryChannel;

#[async_trait]
impl ReminderDeliveryChannel for LogDeliveryChannel {
    async fn deliver(&self, content: &ReminderContent) -> Result<(), DeliveryError> {
        log::info!("🔔 {} {}", content.title, content.body);
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopDeliveryChannel;

#[cfg(feature = "desktop")]
mod desktop {
    use async_trait::async_trait;

    use agua_models::reminder::ReminderContent;

    use super::{DeliveryError, ReminderDeliveryChannel};

    const APP_NAME: &str = "Agua";

    /// Shows reminders through the desktop notification daemon.
    #[derive(Debug, Clone, Default)]
    pub struct DesktopDeliveryChannel;

    #[async_trait]
    impl ReminderDeliveryChannel for DesktopDeliveryChannel {
        async fn deliver(&self, content: &ReminderContent) -> Result<(), DeliveryError> {
            let content = content.clone();
            tokio::task::spawn_blocking(move || {
                notify_rust::Notification::new()
                    .summary(&content.title)
                    .body(&content.body)
                    .appname(APP_NAME)
                    .show()
                    .map(|_| ())
                    .map_err(|e| DeliveryError::Desktop(e.to_string()))
            })
            .await
            .map_err(|e| DeliveryError::Common(e.into()))?
        }
    }
}
