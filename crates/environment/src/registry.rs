//! Process-scoped table of shared environments.
//!
//! # Purpose
//!
//! Map environment names to their [`EnvironmentLoader`]s so any consumer can find a shared
//! artifact set by name, while each set is built exactly once.
//!
//! # Mental model
//!
//! * Readers pin an `Arc<HashMap<..>>` snapshot and look names up in it.
//! * Writers serialize on one mutex, build the missing loader, then publish a copy of the
//!   table with the new entry added.
//! * Entries are never replaced or removed.
//!
//! # Invariants
//!
//! * Keys are case-insensitive ([`commons_config::fold_name`]).
//! * A published loader is never rebuilt; asking to build a name that is present returns the
//!   existing `Arc` (see `tests::init_is_idempotent`).
//! * A failed build leaves no entry and does not affect other environments.
//!
//! # Concurrency & ordering
//!
//! * [`EnvironmentRegistry::lookup`] is wait-free (`ArcSwap` load + immutable map read).
//! * Builds hold the writer mutex across filesystem expansion; lookups running meanwhile see the
//!   name as absent until it is published.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use commons_config::{Config, EnvironmentDef, fold_name};
use commons_pathspec::PathSpec;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::loader::EnvironmentLoader;
use crate::scope::Scope;

type Table = HashMap<String, Arc<EnvironmentLoader>>;

/// Outcome of [`EnvironmentRegistry::init`].
#[derive(Debug, Default)]
pub struct InitReport {
	/// Environments built by this call, in configuration order.
	pub built: Vec<String>,
	/// Environments skipped because they were already present.
	pub existing: Vec<String>,
	/// Environments that failed to build and are absent.
	pub failed: Vec<(String, BuildError)>,
}

/// Whether [`EnvironmentRegistry::build`] built the environment or found it present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDisposition {
	/// This call built and published the environment.
	Built,
	/// The environment was already present and was left untouched.
	Existing,
}

/// Case-insensitive, append-only table of shared environments.
pub struct EnvironmentRegistry {
	ancestor: Arc<dyn Scope>,
	table: ArcSwap<Table>,
	writer: Mutex<()>,
}

impl EnvironmentRegistry {
	/// Creates an empty registry whose environments are all built under `ancestor`.
	pub fn new(ancestor: Arc<dyn Scope>) -> Self {
		Self {
			ancestor,
			table: ArcSwap::from_pointee(Table::new()),
			writer: Mutex::new(()),
		}
	}

	/// Builds every environment declared in `config` that is not yet present.
	///
	/// Never fails as a whole: each environment's failure is logged and reported, and the
	/// remaining environments are still built. Calling it again with the same or overlapping
	/// configuration builds only the new names.
	pub fn init(&self, config: &Config) -> InitReport {
		let mut report = InitReport::default();
		for def in &config.environments {
			match self.build(def, &config.artifact_extension) {
				Ok((_, BuildDisposition::Built)) => report.built.push(def.name.clone()),
				Ok((_, BuildDisposition::Existing)) => report.existing.push(def.name.clone()),
				Err(error) => {
					warn!(environment = %def.name, %error, "failed to build environment");
					report.failed.push((def.name.clone(), error));
				}
			}
		}
		info!(
			built = report.built.len(),
			existing = report.existing.len(),
			failed = report.failed.len(),
			"environment registry initialized"
		);
		report
	}

	/// Returns the environment for `def.name`, building and publishing it if absent.
	pub fn build(
		&self,
		def: &EnvironmentDef,
		artifact_extension: &str,
	) -> Result<(Arc<EnvironmentLoader>, BuildDisposition), BuildError> {
		if def.name.trim().is_empty() {
			return Err(BuildError::BlankName { name: def.name.clone() });
		}
		let key = fold_name(&def.name);

		let _writer = self.writer.lock();
		if let Some(existing) = self.table.load().get(&key) {
			return Ok((Arc::clone(existing), BuildDisposition::Existing));
		}

		let specs: Vec<PathSpec> = def.paths.iter().map(PathSpec::parse).collect();
		let loader = Arc::new(self.build_artifact_set(def.name.as_str(), &specs, artifact_extension));
		if loader.urls().next().is_none() {
			debug!(environment = %def.name, "environment has no valid locations");
		}

		let mut table = Table::clone(&self.table.load());
		table.insert(key, Arc::clone(&loader));
		self.table.store(Arc::new(table));
		Ok((loader, BuildDisposition::Built))
	}

	/// Expands `specs` into an unpublished loader bound to the registry's ancestor.
	pub fn build_artifact_set<'a>(
		&self,
		name: &str,
		specs: impl IntoIterator<Item = &'a PathSpec>,
		artifact_extension: &str,
	) -> EnvironmentLoader {
		EnvironmentLoader::build(name, specs, Arc::clone(&self.ancestor), artifact_extension)
	}

	/// Looks an environment up by case-insensitive name.
	pub fn lookup(&self, name: &str) -> Option<Arc<EnvironmentLoader>> {
		self.table.load().get(&fold_name(name)).cloned()
	}

	/// Returns the configured names of every environment, sorted case-insensitively.
	pub fn names(&self) -> Vec<String> {
		let table = self.table.load();
		let mut names: Vec<_> = table.iter().map(|(key, loader)| (key.clone(), loader.name().to_string())).collect();
		names.sort();
		names.into_iter().map(|(_, name)| name).collect()
	}

	/// Returns the number of environments.
	pub fn len(&self) -> usize {
		self.table.load().len()
	}

	/// Returns true if no environment has been built.
	pub fn is_empty(&self) -> bool {
		self.table.load().is_empty()
	}

	/// Returns the ancestor scope shared by every environment.
	pub fn ancestor(&self) -> &Arc<dyn Scope> {
		&self.ancestor
	}
}

impl std::fmt::Debug for EnvironmentRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EnvironmentRegistry").field("environments", &self.names()).finish_non_exhaustive()
	}
}
