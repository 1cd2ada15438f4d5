mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "poedata=debug" } else { "poedata=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Generate { locale: None });

    match command {
        Commands::Generate { locale } => {
            let config = Config::load(&cli.root, cli.config.as_deref())?;
            commands::generate::handle(&cli.root, &config, locale.as_deref())?;
        }

        Commands::Normalize { text } => {
            commands::normalize::handle(&text);
        }

        Commands::Config { show, init } => {
            commands::configure::handle(&cli.root, cli.config.as_deref(), show, init)?;
        }
    }

    Ok(())
}
