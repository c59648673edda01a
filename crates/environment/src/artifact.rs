//! Artifact handles and resolution outcomes.

use std::sync::Arc;

use url::Url;

/// An opaque loadable unit returned by a successful resolution.
///
/// Cheap to clone; the bytes are shared. `origin` labels the environment or scope that
/// produced it, which is how callers tell two artifacts of the same name apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
	name: Arc<str>,
	url: Url,
	origin: Arc<str>,
	bytes: Arc<[u8]>,
}

impl Artifact {
	/// Creates an artifact handle.
	pub fn new(name: impl Into<Arc<str>>, url: Url, origin: impl Into<Arc<str>>, bytes: impl Into<Arc<[u8]>>) -> Self {
		Self {
			name: name.into(),
			url,
			origin: origin.into(),
			bytes: bytes.into(),
		}
	}

	/// Returns the symbolic name this artifact was resolved for.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns where the artifact was loaded from.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Returns the label of the environment or scope that produced the artifact.
	pub fn origin(&self) -> &str {
		&self.origin
	}

	/// Returns the artifact's contents.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}
}

/// Terminal outcome of resolving a name through a scope or resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// The name resolved to an artifact.
	Found(Artifact),
	/// Nothing reachable provides the name. Not an error.
	NotFound,
}

impl Resolution {
	/// Returns the artifact, if found.
	pub fn artifact(&self) -> Option<&Artifact> {
		match self {
			Resolution::Found(artifact) => Some(artifact),
			Resolution::NotFound => None,
		}
	}

	/// Consumes the resolution, returning the artifact if found.
	pub fn into_artifact(self) -> Option<Artifact> {
		match self {
			Resolution::Found(artifact) => Some(artifact),
			Resolution::NotFound => None,
		}
	}

	/// Returns true if an artifact was found.
	pub fn is_found(&self) -> bool {
		matches!(self, Resolution::Found(_))
	}
}

/// Outcome of looking a name up inside one environment's own artifact set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
	/// The environment provides the name.
	Found(Artifact),
	/// No location in the environment has an entry for the name.
	NotFound,
	/// An entry may exist but a location could not be opened or read.
	StructuralFailure(String),
}
