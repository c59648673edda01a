//! `commons`: inspect shared environments and resolve names against them.

mod cli;
mod commands;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use commons_config::Config;
use tracing::info;

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let path = cli.config_path().context("no configuration directory; pass --config")?;
	let config = Config::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
	info!(path = %path.display(), environments = config.environments.len(), "configuration loaded");

	let session = commands::Session::open(config);
	let mut out = io::stdout().lock();
	let ok = match &cli.command {
		Command::Environments => commands::environments(&session, &mut out)?,
		Command::Resolve { consumer, names } => commands::resolve(&session, consumer, names, &mut out)?,
		Command::Resource { consumer, name, all } => commands::resource(&session, consumer, name, *all, &mut out)?,
	};
	out.flush()?;

	Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("COMMONS_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("commons=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(verbose)
		.init();
}
