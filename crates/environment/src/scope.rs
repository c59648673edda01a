//! Ancestor scope interface.

use url::Url;

use crate::artifact::Resolution;
use crate::error::ScopeError;

/// A resolution scope that a consumer or environment can delegate to.
///
/// Implemented by host scopes, by [`crate::EnvironmentLoader`], and by consumer resolvers so
/// scopes can be chained. Implementations must be safe to call from many threads at once.
pub trait Scope: Send + Sync {
	/// Resolves a symbolic name.
	///
	/// `Ok(Resolution::NotFound)` is an ordinary answer; `Err` is an authoritative failure that
	/// callers propagate.
	fn resolve(&self, name: &str) -> Result<Resolution, ScopeError>;

	/// Finds one resource by entry path.
	fn find_resource(&self, _name: &str) -> Option<Url> {
		None
	}

	/// Finds every resource with the given entry path.
	fn find_resources(&self, _name: &str) -> Vec<Url> {
		Vec::new()
	}
}

/// The root scope: resolves nothing and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl Scope for EmptyScope {
	fn resolve(&self, _name: &str) -> Result<Resolution, ScopeError> {
		Ok(Resolution::NotFound)
	}
}
