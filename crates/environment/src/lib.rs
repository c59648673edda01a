//! Shared environments and their registry.
//!
//! An environment is a named, immutable set of artifact locations built once from path
//! specifications. Consumers never own environments; they look them up by name in an
//! [`EnvironmentRegistry`] and resolve names inside them.
//!
//! * [`artifact`]: the opaque [`Artifact`] handle and lookup outcomes
//! * [`scope`]: the [`Scope`] interface for ancestor scopes
//! * [`naming`]: mapping symbolic names to entry paths
//! * [`loader`]: [`EnvironmentLoader`], one environment's artifact set
//! * [`registry`]: [`EnvironmentRegistry`], the case-insensitive, append-only table

pub mod artifact;
pub mod error;
pub mod loader;
pub mod naming;
pub mod registry;
pub mod scope;
mod source;

pub use artifact::{Artifact, Lookup, Resolution};
pub use error::{BuildError, ScopeError};
pub use loader::{EnvironmentLoader, LoaderStats, Resources};
pub use registry::{BuildDisposition, EnvironmentRegistry, InitReport};
pub use scope::{EmptyScope, Scope};
