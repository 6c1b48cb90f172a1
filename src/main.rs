use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxa::cli::Cli;
use voxa::config::ConfigStore;
use voxa::dispatch::Dispatcher;
use voxa::output;
use voxa_core::db::DbConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "voxa=warn,voxa_core=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut dispatcher = Dispatcher::new(ConfigStore::local(), DbConfig::from_env());
    output::finish(dispatcher.dispatch(cli.command).await)
}
