use std::path::PathBuf;

use agua_models::settings::Theme;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "agua")]
#[command(about = "Counts the glasses of water you drink and reminds you to drink more")]
pub struct Args {
    /// Store file to use instead of the configured `storage.path`
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log one glass of water for today
    Drink,
    /// Show today's count against the daily goal
    Today,
    /// List every logged day, most recent first
    History,
    /// Delete the whole history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Print a random hydration tip
    Tip,
    /// Keep reminders firing until interrupted, following settings changes
    Run,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Set(SetSettingsArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct SetSettingsArgs {
    /// Turn reminders on or off
    #[arg(long, action = clap::ArgAction::Set)]
    pub enabled: Option<bool>,
    /// Hours between reminders, any positive number
    #[arg(long, value_parser = parse_interval_hours)]
    pub interval: Option<f64>,
    #[arg(long)]
    pub theme: Option<Theme>,
    /// Glasses per day
    #[arg(long)]
    pub goal: Option<u32>,
    #[arg(long)]
    pub name: Option<String>,
}

impl SetSettingsArgs {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.interval.is_none()
            && self.theme.is_none()
            && self.goal.is_none()
            && self.name.is_none()
    }
}

fn parse_interval_hours(raw: &str) -> Result<f64, String> {
    let hours: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number of hours"))?;

    if hours.is_finite() && hours > 0.0 {
        Ok(hours)
    } else {
        Err(format!("interval must be a positive number of hours, got {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_set_parses_every_field() {
        let args = Args::try_parse_from([
            "agua", "settings", "set", "--enabled", "false", "--interval", "0.5", "--theme",
            "dark", "--goal", "10", "--name", "Ana",
        ])
        .unwrap();

        let Command::Settings(SettingsCommand::Set(set)) = args.command else {
            panic!("expected settings set");
        };
        assert_eq!(set.enabled, Some(false));
        assert_eq!(set.interval, Some(0.5));
        assert_eq!(set.theme, Some(Theme::Dark));
        assert_eq!(set.goal, Some(10));
        assert_eq!(set.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        for bad in ["0", "-1", "soon", "NaN"] {
            let parsed =
                Args::try_parse_from(["agua", "settings", "set", "--interval", bad]);
            assert!(parsed.is_err(), "interval {bad} accepted");
        }
    }

    #[test]
    fn store_flag_is_global() {
        let args = Args::try_parse_from(["agua", "drink", "--store", "/tmp/x.json"]).unwrap();
        assert_eq!(args.store, Some(PathBuf::from("/tmp/x.json")));
        assert!(matches!(args.command, Command::Drink));
    }
}
