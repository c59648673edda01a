//! CLI schema for the `commons` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "commons")]
#[command(about = "Inspect shared environments and resolve names against them")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to `<config dir>/commons/environments.toml`)
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// List environments and their locations
	Environments,
	/// Resolve symbolic names as a consumer would
	Resolve {
		/// Consumer whose policy applies
		consumer: String,
		/// Dotted names to resolve
		#[arg(required = true)]
		names: Vec<String>,
	},
	/// Find a resource in a consumer's environments
	Resource {
		/// Consumer whose environments are searched
		consumer: String,
		/// Resource path inside the locations
		name: String,
		/// List every match from the first environment that has one
		#[arg(long)]
		all: bool,
	},
}

impl Cli {
	/// Returns the configuration file to read.
	pub fn config_path(&self) -> Option<PathBuf> {
		self.config
			.clone()
			.or_else(|| dirs::config_dir().map(|dir| dir.join("commons").join("environments.toml")))
	}
}
