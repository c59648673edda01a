//! One environment's artifact set.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use commons_pathspec::{ArtifactLocation, PathSpec, expand_all};
use indexmap::IndexMap;
use tracing::{debug, trace};
use url::Url;

use crate::artifact::{Artifact, Lookup, Resolution};
use crate::error::ScopeError;
use crate::naming::{entry_path, is_safe_entry};
use crate::scope::Scope;
use crate::source::Source;

/// Lookup counters for one environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
	/// Artifact lookups against this environment's own locations.
	pub artifact_lookups: u64,
	/// Resource lookups and enumerations against this environment's own locations.
	pub resource_lookups: u64,
}

/// An immutable, ordered set of artifact locations bound to one name and one ancestor scope.
///
/// Locations are unique by URL; the first occurrence keeps its position. Nothing about the set
/// changes after construction.
pub struct EnvironmentLoader {
	name: Arc<str>,
	ancestor: Arc<dyn Scope>,
	artifact_extension: String,
	sources: Vec<Source>,
	artifact_lookups: AtomicU64,
	resource_lookups: AtomicU64,
}

impl EnvironmentLoader {
	/// Expands `specs` and builds the environment's artifact set.
	pub fn build<'a>(
		name: impl Into<Arc<str>>,
		specs: impl IntoIterator<Item = &'a PathSpec>,
		ancestor: Arc<dyn Scope>,
		artifact_extension: impl Into<String>,
	) -> Self {
		Self::from_locations(name, expand_all(specs), ancestor, artifact_extension)
	}

	/// Builds the artifact set from already validated locations.
	pub fn from_locations(
		name: impl Into<Arc<str>>,
		locations: impl IntoIterator<Item = ArtifactLocation>,
		ancestor: Arc<dyn Scope>,
		artifact_extension: impl Into<String>,
	) -> Self {
		let name = name.into();
		let mut unique = IndexMap::new();
		for location in locations {
			unique.entry(location.url().clone()).or_insert(location);
		}
		debug!(environment = %name, locations = unique.len(), "built environment artifact set");
		Self {
			name,
			ancestor,
			artifact_extension: artifact_extension.into(),
			sources: unique.into_values().map(Source::new).collect(),
			artifact_lookups: AtomicU64::new(0),
			resource_lookups: AtomicU64::new(0),
		}
	}

	/// Returns the environment name as configured.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the ancestor scope the environment was built under.
	pub fn ancestor(&self) -> &Arc<dyn Scope> {
		&self.ancestor
	}

	/// Returns the artifact set's URLs in search order.
	pub fn urls(&self) -> impl Iterator<Item = &Url> + '_ {
		self.sources.iter().map(|source| source.location().url())
	}

	/// Returns the artifact set's locations in search order.
	pub fn locations(&self) -> impl Iterator<Item = &ArtifactLocation> + '_ {
		self.sources.iter().map(Source::location)
	}

	/// Returns the lookup counters.
	pub fn stats(&self) -> LoaderStats {
		LoaderStats {
			artifact_lookups: self.artifact_lookups.load(Ordering::Relaxed),
			resource_lookups: self.resource_lookups.load(Ordering::Relaxed),
		}
	}

	/// Looks `name` up in this environment's own locations, ignoring the ancestor.
	///
	/// Locations are tried in order and the first that has the entry wins. A location that
	/// fails structurally does not stop the scan; the failure is only reported when no later
	/// location provides the entry.
	pub fn lookup(&self, name: &str) -> Lookup {
		self.artifact_lookups.fetch_add(1, Ordering::Relaxed);
		let Some(entry) = entry_path(name, &self.artifact_extension) else {
			return Lookup::NotFound;
		};

		let mut failure = None;
		for source in &self.sources {
			match source.read(&entry) {
				Ok(Some(found)) => {
					return Lookup::Found(Artifact::new(name, found.url, self.name.clone(), found.bytes));
				}
				Ok(None) => {}
				Err(detail) => {
					trace!(environment = %self.name, name, %detail, "location failed");
					failure.get_or_insert(detail);
				}
			}
		}
		failure.map_or(Lookup::NotFound, Lookup::StructuralFailure)
	}

	/// Finds the first own location that has resource `name`.
	pub fn locate_resource(&self, name: &str) -> Option<Url> {
		self.resource_lookups.fetch_add(1, Ordering::Relaxed);
		if !is_safe_entry(name) {
			return None;
		}
		self.sources.iter().find_map(|source| source.locate(name))
	}

	/// Lazily enumerates every own location that has resource `name`.
	pub fn resources(self: &Arc<Self>, name: &str) -> Resources {
		self.resource_lookups.fetch_add(1, Ordering::Relaxed);
		if !is_safe_entry(name) {
			return Resources::empty();
		}
		Resources {
			loader: Some(Arc::clone(self)),
			entry: name.to_string(),
			cursor: 0,
			peeked: None,
		}
	}
}

impl std::fmt::Debug for EnvironmentLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EnvironmentLoader")
			.field("name", &self.name)
			.field("urls", &self.urls().map(Url::as_str).collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

/// Delegates to the ancestor first, then the environment's own locations.
impl Scope for EnvironmentLoader {
	fn resolve(&self, name: &str) -> Result<Resolution, ScopeError> {
		if let Resolution::Found(artifact) = self.ancestor.resolve(name)? {
			return Ok(Resolution::Found(artifact));
		}
		match self.lookup(name) {
			Lookup::Found(artifact) => Ok(Resolution::Found(artifact)),
			Lookup::NotFound => Ok(Resolution::NotFound),
			Lookup::StructuralFailure(detail) => Err(ScopeError::Failed {
				scope: self.name.to_string(),
				name: name.to_string(),
				detail,
			}),
		}
	}

	fn find_resource(&self, name: &str) -> Option<Url> {
		self.ancestor.find_resource(name).or_else(|| self.locate_resource(name))
	}

	fn find_resources(&self, name: &str) -> Vec<Url> {
		let mut urls = self.ancestor.find_resources(name);
		self.resource_lookups.fetch_add(1, Ordering::Relaxed);
		if is_safe_entry(name) {
			urls.extend(self.sources.iter().filter_map(|source| source.locate(name)));
		}
		urls
	}
}

/// Lazy enumeration of one environment's resource URLs, in location order.
pub struct Resources {
	loader: Option<Arc<EnvironmentLoader>>,
	entry: String,
	cursor: usize,
	peeked: Option<Url>,
}

impl Resources {
	/// An enumeration with no elements.
	pub fn empty() -> Self {
		Self {
			loader: None,
			entry: String::new(),
			cursor: 0,
			peeked: None,
		}
	}

	/// Returns the next URL without consuming it.
	pub fn peek(&mut self) -> Option<&Url> {
		if self.peeked.is_none() {
			self.peeked = self.advance();
		}
		self.peeked.as_ref()
	}

	/// Returns the environment being enumerated, if any.
	pub fn environment(&self) -> Option<&str> {
		self.loader.as_deref().map(EnvironmentLoader::name)
	}

	fn advance(&mut self) -> Option<Url> {
		let loader = self.loader.as_ref()?;
		while let Some(source) = loader.sources.get(self.cursor) {
			self.cursor += 1;
			if let Some(url) = source.locate(&self.entry) {
				return Some(url);
			}
		}
		None
	}
}

impl Iterator for Resources {
	type Item = Url;

	fn next(&mut self) -> Option<Url> {
		self.peeked.take().or_else(|| self.advance())
	}
}

impl std::fmt::Debug for Resources {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resources")
			.field("environment", &self.environment())
			.field("entry", &self.entry)
			.field("cursor", &self.cursor)
			.finish()
	}
}
