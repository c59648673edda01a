//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A configuration file failed to parse.
	#[error("{path}: {error}")]
	File {
		/// Path to the file that failed to parse.
		path: PathBuf,
		/// The parse error.
		error: Box<ConfigError>,
	},
}

/// Non-fatal issues found while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// Two environments share a name (ignoring case); only the first is built.
	DuplicateEnvironment {
		/// The later, ignored declaration's name.
		name: String,
	},
	/// A consumer lists an environment that is never declared.
	UndeclaredEnvironment {
		/// Consumer name.
		consumer: String,
		/// The missing environment name.
		environment: String,
	},
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::DuplicateEnvironment { name } => {
				write!(f, "environment '{name}' is declared more than once; later declarations are ignored")
			}
			ConfigWarning::UndeclaredEnvironment { consumer, environment } => {
				write!(f, "consumer '{consumer}' searches undeclared environment '{environment}'; it will contribute nothing")
			}
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
