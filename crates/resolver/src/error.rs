//! Resolution and policy errors.

use commons_environment::ScopeError;
use thiserror::Error;

/// A resolution that did not reach a terminal outcome.
///
/// Misses are not errors: they come back as `Resolution::NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// `name` was requested again on this consumer while its own resolution was running on the
	/// same thread.
	#[error("resolution of `{name}` re-entered itself")]
	Cycle {
		/// The symbolic name.
		name: String,
	},

	/// The ancestor scope failed; propagated unchanged.
	#[error(transparent)]
	Ancestor(ScopeError),
}

impl From<ScopeError> for ResolveError {
	fn from(error: ScopeError) -> Self {
		match error {
			ScopeError::Cycle { name } => ResolveError::Cycle { name },
			other => ResolveError::Ancestor(other),
		}
	}
}

impl From<ResolveError> for ScopeError {
	fn from(error: ResolveError) -> Self {
		match error {
			ResolveError::Cycle { name } => ScopeError::Cycle { name },
			ResolveError::Ancestor(error) => error,
		}
	}
}

/// A consumer policy that could not be compiled.
#[derive(Debug, Error)]
pub enum PolicyError {
	#[error("invalid name pattern `{pattern}`: {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: globset::Error,
	},
	#[error("failed to build name patterns: {0}")]
	PatternSet(#[source] globset::Error),
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
