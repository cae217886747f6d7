use std::{sync::Arc, time::Duration};

use agua_models::{progress::DailyProgress, settings::NotificationSettings, tips};
use agua_scheduler::{
    IntervalNotificationService, NotificationService, ReminderScheduler,
    delivery::ReminderDeliveryChannel,
};
use agua_storage::{ConsumptionLedger, FileKeyValueStore, KeyValueStore, SettingsRepository};
use anyhow::Context;

use crate::{
    appsettings::AppSettings,
    cli::{Command, SetSettingsArgs, SettingsCommand},
    clock::Clock,
};

pub struct App {
    ledger: ConsumptionLedger,
    settings: SettingsRepository,
    clock: Clock,
    config: AppSettings,
}

impl App {
    pub fn new(config: AppSettings) -> Self {
        log::debug!("Using store {}", config.storage.path.display());
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&config.storage.path));
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppSettings, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ledger: ConsumptionLedger::new(Arc::clone(&store)),
            settings: SettingsRepository::new(store),
            clock: Clock::new(config.clock.timezone),
            config,
        }
    }

    pub async fn execute(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Drink => self.drink().await,
            Command::Today => self.today().await,
            Command::History => self.history().await,
            Command::Clear { yes } => self.clear(yes).await,
            Command::Settings(SettingsCommand::Show) => self.show_settings().await,
            Command::Settings(SettingsCommand::Set(args)) => self.set_settings(args).await,
            Command::Tip => {
                let tip = tips::random_tip();
                println!("{}\n{}", tip.title, tip.text);
                Ok(())
            }
            Command::Run => self.run().await,
        }
    }

    async fn drink(&self) -> anyhow::Result<()> {
        let count = self
            .ledger
            .record_glass(self.clock.today())
            .await
            .context("Failed to record glass")?;
        let settings = self.settings.get().await?;
        let progress = DailyProgress::new(count, settings.daily_goal);

        println!("{count} glass(es) today ({progress}) 💧");
        if progress.is_reached() {
            match settings.user_name.as_str() {
                "" => println!("Daily goal reached!"),
                name => println!("Daily goal reached, well done {name}!"),
            }
        } else {
            println!("{} more to reach your goal", progress.remaining());
        }
        Ok(())
    }

    async fn today(&self) -> anyhow::Result<()> {
        let today = self.clock.today();
        let count = self.ledger.today_count(today).await?;
        let goal = self.settings.get().await?.daily_goal;

        println!("Glasses today: {}", DailyProgress::new(count, goal));
        Ok(())
    }

    async fn history(&self) -> anyhow::Result<()> {
        let history = self.ledger.history().await?;
        if history.is_empty() {
            println!("No consumption records found");
        }
        for record in history {
            println!("{}: {} glass(es) 💧", record.date, record.count);
        }
        Ok(())
    }

    async fn clear(&self, confirmed: bool) -> anyhow::Result<()> {
        if !confirmed {
            println!("This deletes the whole consumption history. Re-run with --yes to confirm.");
            return Ok(());
        }

        self.ledger
            .clear_history()
            .await
            .context("Failed to clear history")?;
        println!("History cleared");
        Ok(())
    }

    async fn show_settings(&self) -> anyhow::Result<()> {
        print_settings(&self.settings.get().await?);
        Ok(())
    }

    async fn set_settings(&self, args: SetSettingsArgs) -> anyhow::Result<()> {
        if args.is_empty() {
            println!("Nothing to change.");
            return self.show_settings().await;
        }

        let updated = self
            .settings
            .update(move |settings| {
                if let Some(enabled) = args.enabled {
                    settings.enabled = enabled;
                }
                if let Some(interval) = args.interval {
                    settings.interval_hours = interval;
                }
                if let Some(theme) = args.theme {
                    settings.theme = theme;
                }
                if let Some(goal) = args.goal {
                    settings.daily_goal = goal;
                }
                if let Some(name) = args.name {
                    settings.user_name = name;
                }
            })
            .await
            .context("Failed to save settings")?;

        print_settings(&updated);
        Ok(())
    }

    fn notification_service(&self) -> Arc<IntervalNotificationService> {
        Arc::new(
            IntervalNotificationService::new(delivery_channel())
                .with_permission(self.config.notification.permission_granted),
        )
    }

    /// Schedules the reminder and re-applies it whenever the stored settings change.
    async fn run(&self) -> anyhow::Result<()> {
        let service = self.notification_service();
        let scheduler = ReminderScheduler::new(service.clone(), self.config.notification.content());

        let mut applied = self.settings.get().await.unwrap_or_else(|e| {
            log::warn!("Could not load settings, using defaults. [error = {e}]");
            NotificationSettings::default()
        });
        let state = scheduler.start(&applied).await;
        log::info!("Reminders started {state:?}");

        let poll_every = Duration::from_secs(self.config.notification.settings_poll_secs.max(1));
        let mut poll = tokio::time::interval(poll_every);
        poll.tick().await;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result.context("Failed to listen for shutdown signal")?;
                    log::info!("Shutting down");
                    break;
                }
                _ = poll.tick() => {
                    let current = match self.settings.get().await {
                        Ok(current) => current,
                        Err(e) => {
                            log::warn!("Could not reload settings. [error = {e}]");
                            continue;
                        }
                    };
                    if current == applied {
                        continue;
                    }

                    match scheduler.apply_settings(&current).await {
                        Ok(state) => {
                            log::info!("Settings changed, reminders now {state:?}");
                            applied = current;
                        }
                        Err(e) => log::warn!("Failed to apply new settings. [error = {e:#}]"),
                    }
                }
            }
        }

        service.cancel_all().await
    }
}

fn print_settings(settings: &NotificationSettings) {
    println!("Reminders:  {}", if settings.enabled { "on" } else { "off" });
    println!("Interval:   {:.2} hour(s)", settings.interval_hours);
    println!("Theme:      {}", settings.theme);
    println!("Daily goal: {} glass(es)", settings.daily_goal);
    if !settings.user_name.is_empty() {
        println!("Name:       {}", settings.user_name);
    }
}

#[cfg(feature = "desktop")]
fn delivery_channel() -> Arc<dyn ReminderDeliveryChannel> {
    Arc::new(agua_scheduler::delivery::DesktopDeliveryChannel)
}

#[cfg(not(feature = "desktop"))]
fn delivery_channel() -> Arc<dyn ReminderDeliveryChannel> {
    Arc::new(agua_scheduler::delivery::LogDeliveryChannel)
}
