//! Error types for environment construction and scope resolution.

use thiserror::Error;

/// Why an environment could not be built.
///
/// A failed environment is simply absent from the registry; consumers that list it see an
/// environment that contributes nothing. Invalid locations are not build failures: they are
/// dropped during expansion, so the only failure is the local name guard below.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
	/// The environment name is empty or blank.
	#[error("environment name {name:?} is blank")]
	BlankName {
		/// Name as configured.
		name: String,
	},
}

/// Failure raised by a [`crate::Scope`] while resolving a name.
///
/// Ancestor scopes are authoritative: resolvers propagate these unchanged instead of treating
/// them as "not found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
	/// The name is already being resolved further up this same call chain.
	#[error("resolution of `{name}` re-entered itself")]
	Cycle {
		/// The symbolic name.
		name: String,
	},

	/// The scope found the name but could not produce an artifact for it.
	#[error("scope `{scope}` failed to resolve `{name}`: {detail}")]
	Failed {
		/// Scope label.
		scope: String,
		/// The symbolic name.
		name: String,
		/// Human-readable cause.
		detail: String,
	},
}
