mod app;
mod appsettings;
mod cli;
mod clock;

use anyhow::Context;
use clap::Parser;

use crate::{app::App, appsettings::AppSettings, cli::Args};

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let mut settings = AppSettings::new().context("Failed to load appsettings")?;
    if let Some(store) = args.store {
        settings.storage.path = store;
    }

    App::new(settings).execute(args.command).await
}
