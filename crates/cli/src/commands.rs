//! Subcommand implementations.
//!
//! Each command writes its report to `out` and returns whether everything asked for was found,
//! so the binary can set its exit status.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use commons_config::Config;
use commons_environment::{EmptyScope, EnvironmentRegistry};
use commons_resolver::{NamespaceResolver, ResolutionPolicy};
use tracing::warn;

/// A loaded configuration and the registry built from it.
pub struct Session {
	config: Config,
	registry: Arc<EnvironmentRegistry>,
}

impl Session {
	/// Builds every configured environment under an empty host scope.
	pub fn open(config: Config) -> Self {
		for warning in &config.warnings {
			warn!(%warning, "configuration warning");
		}
		let registry = Arc::new(EnvironmentRegistry::new(Arc::new(EmptyScope)));
		registry.init(&config);
		Self { config, registry }
	}

	pub fn registry(&self) -> &Arc<EnvironmentRegistry> {
		&self.registry
	}

	/// Creates the resolver for a configured consumer.
	pub fn resolver(&self, consumer: &str) -> Result<NamespaceResolver> {
		let def = self
			.config
			.consumer(consumer)
			.with_context(|| format!("consumer `{consumer}` is not configured"))?;
		let policy =
			ResolutionPolicy::from_consumer(def).with_context(|| format!("consumer `{consumer}` has an invalid policy"))?;
		Ok(NamespaceResolver::new(
			Arc::clone(&self.registry),
			policy,
			Arc::clone(self.registry.ancestor()),
		))
	}
}

/// Prints each environment with its configured path count, followed by its locations.
pub fn environments(session: &Session, out: &mut impl Write) -> Result<bool> {
	for name in session.registry().names() {
		let Some(loader) = session.registry().lookup(&name) else {
			continue;
		};
		let paths = session.config.environment(&name).map_or(0, |def| def.paths.len());
		writeln!(out, "{name}\t{paths} paths")?;
		for location in loader.locations() {
			writeln!(out, "  {}\t{}", location.url(), location.kind())?;
		}
	}
	Ok(true)
}

/// Prints `name<TAB>origin<TAB>url` per found name and `name<TAB>-` per miss.
pub fn resolve(session: &Session, consumer: &str, names: &[String], out: &mut impl Write) -> Result<bool> {
	let resolver = session.resolver(consumer)?;
	let mut all_found = true;
	for name in names {
		let resolution = resolver.resolve(name).with_context(|| format!("failed to resolve `{name}`"))?;
		match resolution.artifact() {
			Some(artifact) => writeln!(out, "{name}\t{}\t{}", artifact.origin(), artifact.url())?,
			None => {
				all_found = false;
				writeln!(out, "{name}\t-")?;
			}
		}
	}
	Ok(all_found)
}

/// Prints the URL of a resource, or every URL with `all`.
pub fn resource(session: &Session, consumer: &str, name: &str, all: bool, out: &mut impl Write) -> Result<bool> {
	let resolver = session.resolver(consumer)?;
	let resources = resolver.resources();
	let mut found = false;
	if all {
		for url in resources.find_all(name) {
			found = true;
			writeln!(out, "{url}")?;
		}
	} else if let Some(url) = resources.find_one(name) {
		found = true;
		writeln!(out, "{url}")?;
	}
	Ok(found)
}

#[cfg(test)]
mod tests;
