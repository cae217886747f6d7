use std::{
    sync::{
        Mutex as StdMutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use proptest::prelude::*;
use test_strategy::proptest;

use super::*;
use agua_models::settings::MAX_INTERVAL_HOURS;

use crate::{
    IntervalNotificationService, MAX_REMINDER_PERIOD,
    delivery::{DeliveryError, ReminderDeliveryChannel},
};

/// Tracks what would be scheduled on the device.
struct FakeNotificationService {
    granted: bool,
    active: StdMutex<Vec<RepeatingReminder>>,
    fail_scheduling: bool,
}

impl FakeNotificationService {
    fn granted() -> Self {
        Self {
            granted: true,
            active: StdMutex::new(Vec::new()),
            fail_scheduling: false,
        }
    }

    fn denied() -> Self {
        Self {
            granted: false,
            ..Self::granted()
        }
    }

    fn active(&self) -> Vec<RepeatingReminder> {
        self.active.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationService for FakeNotificationService {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        Ok(self.granted)
    }

    async fn cancel_all(&self) -> anyhow::Result<()> {
        self.active.lock().unwrap().clear();
        Ok(())
    }

    async fn schedule_repeating(&self, reminder: RepeatingReminder) -> anyhow::Result<()> {
        if self.fail_scheduling {
            anyhow::bail!("Notification service unavailable");
        }
        self.active.lock().unwrap().push(reminder);
        Ok(())
    }
}

struct CountingDeliveryChannel(Arc<AtomicUsize>);

#[async_trait]
impl ReminderDeliveryChannel for CountingDeliveryChannel {
    async fn deliver(&self, _content: &ReminderContent) -> Result<(), DeliveryError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct TestContext {
    pub notifications: Arc<FakeNotificationService>,
    pub scheduler: ReminderScheduler,
}

impl TestContext {
    fn new(notifications: FakeNotificationService) -> Self {
        let notifications = Arc::new(notifications);
        let scheduler = ReminderScheduler::new(notifications.clone(), ReminderContent::default());

        Self {
            notifications,
            scheduler,
        }
    }
}

fn settings(enabled: bool, interval_hours: f64) -> NotificationSettings {
    NotificationSettings {
        enabled,
        interval_hours,
        ..Default::default()
    }
}

fn tokio_ct(
    future: impl std::future::Future<Output = Result<(), TestCaseError>>,
) -> Result<(), TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

#[tokio::test]
pub async fn defaults_schedule_hourly_reminder() {
    let ctx = TestContext::new(FakeNotificationService::granted());

    let state = ctx.scheduler.start(&NotificationSettings::default()).await;

    assert_eq!(state, ReminderState::ReminderScheduled { interval_hours: 1.0 });
    let active = ctx.notifications.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].every, Duration::from_secs(3600));
    assert_eq!(active[0].content, ReminderContent::default());
}

#[tokio::test]
pub async fn applying_same_settings_twice_keeps_one_reminder() {
    let ctx = TestContext::new(FakeNotificationService::granted());
    let settings = settings(true, 2.0);

    ctx.scheduler.apply_settings(&settings).await.unwrap();
    ctx.scheduler.apply_settings(&settings).await.unwrap();

    assert_eq!(ctx.notifications.active().len(), 1);
    assert_eq!(
        ctx.scheduler.state().await,
        ReminderState::ReminderScheduled { interval_hours: 2.0 }
    );
}

#[tokio::test]
pub async fn disabling_cancels_reminder() {
    let ctx = TestContext::new(FakeNotificationService::granted());
    ctx.scheduler.apply_settings(&settings(true, 1.0)).await.unwrap();

    let state = ctx.scheduler.apply_settings(&settings(false, 1.0)).await.unwrap();

    assert_eq!(state, ReminderState::NoReminderScheduled);
    assert!(ctx.notifications.active().is_empty());
}

#[tokio::test]
pub async fn denied_permission_skips_scheduling_without_failing() {
    let ctx = TestContext::new(FakeNotificationService::denied());

    let state = ctx.scheduler.start(&NotificationSettings::default()).await;
    assert_eq!(state, ReminderState::NoReminderScheduled);

    let state = ctx.scheduler.apply_settings(&settings(true, 0.5)).await.unwrap();
    assert_eq!(state, ReminderState::NoReminderScheduled);
    assert!(ctx.notifications.active().is_empty());
}

#[tokio::test]
pub async fn scheduling_failure_is_reported_and_state_reset() {
    let ctx = TestContext::new(FakeNotificationService {
        fail_scheduling: true,
        ..FakeNotificationService::granted()
    });

    assert!(ctx.scheduler.apply_settings(&settings(true, 1.0)).await.is_err());
    assert_eq!(ctx.scheduler.state().await, ReminderState::NoReminderScheduled);

    let state = ctx.scheduler.start(&NotificationSettings::default()).await;
    assert_eq!(state, ReminderState::NoReminderScheduled);
}

#[tokio::test]
pub async fn malformed_interval_falls_back_to_one_hour() {
    let ctx = TestContext::new(FakeNotificationService::granted());

    let state = ctx.scheduler.apply_settings(&settings(true, -4.0)).await.unwrap();

    assert_eq!(state, ReminderState::ReminderScheduled { interval_hours: 1.0 });
    assert_eq!(ctx.notifications.active()[0].every, Duration::from_secs(3600));
}

#[tokio::test]
pub async fn huge_interval_is_scheduled_at_the_clamped_period() {
    let ctx = TestContext::new(FakeNotificationService::granted());

    let state = ctx.scheduler.apply_settings(&settings(true, 1e20)).await.unwrap();

    assert_eq!(
        state,
        ReminderState::ReminderScheduled {
            interval_hours: MAX_INTERVAL_HOURS
        }
    );
    let active = ctx.notifications.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].every, MAX_REMINDER_PERIOD);
}

#[tokio::test(start_paused = true)]
pub async fn huge_interval_keeps_interval_service_running() {
    let fired = Arc::new(AtomicUsize::new(0));
    let service = Arc::new(IntervalNotificationService::new(Arc::new(
        CountingDeliveryChannel(fired.clone()),
    )));
    let scheduler = ReminderScheduler::new(service.clone(), ReminderContent::default());

    let state = scheduler.apply_settings(&settings(true, 4e15)).await.unwrap();
    assert_eq!(
        state,
        ReminderState::ReminderScheduled {
            interval_hours: MAX_INTERVAL_HOURS
        }
    );

    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
    assert_eq!(service.active_reminders().await, 1);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    let state = scheduler.apply_settings(&settings(true, 1.0)).await.unwrap();
    assert_eq!(state, ReminderState::ReminderScheduled { interval_hours: 1.0 });
    assert_eq!(service.active_reminders().await, 1);
}

#[tokio::test(start_paused = true)]
pub async fn rescheduling_interval_service_fires_only_new_reminder() {
    let fired = Arc::new(AtomicUsize::new(0));
    let service = Arc::new(IntervalNotificationService::new(Arc::new(
        CountingDeliveryChannel(fired.clone()),
    )));
    let scheduler = ReminderScheduler::new(service.clone(), ReminderContent::default());

    scheduler.start(&settings(true, 1.0)).await;
    scheduler.apply_settings(&settings(true, 0.5)).await.unwrap();
    scheduler.apply_settings(&settings(true, 0.5)).await.unwrap();
    assert_eq!(service.active_reminders().await, 1);

    tokio::time::sleep(Duration::from_secs(2 * 3600 + 1)).await;
    assert_eq!(fired.load(Ordering::Relaxed), 4);

    scheduler.apply_settings(&settings(false, 0.5)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3 * 3600)).await;
    assert_eq!(fired.load(Ordering::Relaxed), 4);
    assert_eq!(service.active_reminders().await, 0);
}

#[proptest(async = tokio_ct)]
async fn disabled_then_enabled_leaves_one_reminder(
    #[strategy(1u32..=400)] centi_hours: u32,
    #[strategy(0usize..4)] repeats: usize,
) {
    let ctx = TestContext::new(FakeNotificationService::granted());
    let hours = f64::from(centi_hours) / 100.0;

    ctx.scheduler.apply_settings(&settings(false, hours)).await.unwrap();
    for _ in 0..=repeats {
        ctx.scheduler.apply_settings(&settings(true, hours)).await.unwrap();
    }

    let active = ctx.notifications.active();
    prop_assert_eq!(active.len(), 1);
    prop_assert_eq!(active[0].every, Duration::from_secs_f64(hours * 3600.0));
    prop_assert_eq!(
        ctx.scheduler.state().await,
        ReminderState::ReminderScheduled { interval_hours: hours }
    );
}
