//! Configuration for shared environments.
//!
//! This crate is the configuration collaborator of the environment registry: it parses a TOML
//! document into the materialized values the registry and resolvers consume, and nothing more.
//!
//! ```toml
//! # Extension appended to symbolic names to find their entries (default "mod").
//! artifact_extension = "mod"
//!
//! [[environment]]
//! name = "Shared"
//! paths = ["/opt/shared/lib/*.zip", "/opt/shared/classes/*"]
//!
//! [[consumer]]
//! name = "webapp"
//! environments = ["shared"]
//! ancestor_first = false
//! delegated = ["*"]
//! excluded = ["org.example.internal.*"]
//! ```
//!
//! Environment names are case-insensitive everywhere; [`fold_name`] is the single definition
//! of that comparison.
//!
//! Non-fatal issues (duplicate environments, consumers that search undeclared environments)
//! are collected in [`Config::warnings`] instead of failing the load.

pub mod error;

use std::collections::HashSet;
use std::path::Path;

pub use error::{ConfigError, ConfigWarning, Result};
use serde::Deserialize;

/// Extension used when the configuration does not name one.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "mod";

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Extension appended to a symbolic name's entry path.
	#[serde(default = "default_artifact_extension")]
	pub artifact_extension: String,
	/// Shared environments, in declaration order.
	#[serde(default, rename = "environment")]
	pub environments: Vec<EnvironmentDef>,
	/// Consumers and their resolution policies.
	#[serde(default, rename = "consumer")]
	pub consumers: Vec<ConsumerDef>,
	/// Non-fatal warnings encountered during parsing.
	#[serde(skip)]
	pub warnings: Vec<ConfigWarning>,
}

/// One shared environment declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentDef {
	/// Environment name, compared case-insensitively.
	pub name: String,
	/// Path specifications, in search order.
	#[serde(default)]
	pub paths: Vec<String>,
}

/// One consumer's resolution policy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerDef {
	/// Consumer name.
	pub name: String,
	/// Visible environments, in search order.
	#[serde(default)]
	pub environments: Vec<String>,
	/// Ask the ancestor scope before the environments.
	#[serde(default)]
	pub ancestor_first: bool,
	/// Name patterns that may be delegated to the ancestor scope.
	#[serde(default = "delegate_everything")]
	pub delegated: Vec<String>,
	/// Name patterns that are never delegated, whatever `delegated` says.
	#[serde(default)]
	pub excluded: Vec<String>,
}

fn default_artifact_extension() -> String {
	DEFAULT_ARTIFACT_EXTENSION.to_string()
}

fn delegate_everything() -> Vec<String> {
	vec!["*".to_string()]
}

impl Default for Config {
	fn default() -> Self {
		Self {
			artifact_extension: default_artifact_extension(),
			environments: Vec::new(),
			consumers: Vec::new(),
			warnings: Vec::new(),
		}
	}
}

impl EnvironmentDef {
	/// Creates a declaration from a name and path specifications.
	pub fn new<I, S>(name: impl Into<String>, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			paths: paths.into_iter().map(Into::into).collect(),
		}
	}
}

impl ConsumerDef {
	/// Creates a local-first consumer that delegates everything and excludes nothing.
	pub fn new<I, S>(name: impl Into<String>, environments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			environments: environments.into_iter().map(Into::into).collect(),
			ancestor_first: false,
			delegated: delegate_everything(),
			excluded: Vec::new(),
		}
	}
}

impl Config {
	/// Parses a TOML document and collects warnings.
	pub fn parse(input: &str) -> Result<Self> {
		let mut config: Config = toml::from_str(input)?;
		config.warnings = config.collect_warnings();
		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input).map_err(|error| ConfigError::File {
			path: path.to_path_buf(),
			error: Box::new(error),
		})
	}

	/// Finds an environment declaration by case-insensitive name.
	pub fn environment(&self, name: &str) -> Option<&EnvironmentDef> {
		let key = fold_name(name);
		self.environments.iter().find(|env| fold_name(&env.name) == key)
	}

	/// Finds a consumer by exact name.
	pub fn consumer(&self, name: &str) -> Option<&ConsumerDef> {
		self.consumers.iter().find(|consumer| consumer.name == name)
	}

	fn collect_warnings(&self) -> Vec<ConfigWarning> {
		let mut warnings = Vec::new();
		let mut declared = HashSet::new();
		for env in &self.environments {
			if !declared.insert(fold_name(&env.name)) {
				warnings.push(ConfigWarning::DuplicateEnvironment { name: env.name.clone() });
			}
		}
		for consumer in &self.consumers {
			for environment in &consumer.environments {
				if !declared.contains(&fold_name(environment)) {
					warnings.push(ConfigWarning::UndeclaredEnvironment {
						consumer: consumer.name.clone(),
						environment: environment.clone(),
					});
				}
			}
		}
		warnings
	}
}

/// Folds an environment name to its case-insensitive key.
pub fn fold_name(name: &str) -> String {
	name.to_lowercase()
}
