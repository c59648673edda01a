//! Resource lookup across a consumer's environments.

use std::sync::Arc;

use commons_environment::{EnvironmentLoader, EnvironmentRegistry, Resources};
use tracing::trace;
use url::Url;

use crate::policy::ResolutionPolicy;

/// Finds resources in the environments a policy names, in policy order.
///
/// Only the environments' own locations are searched. The ancestor scope and the delegation
/// filters play no part.
#[derive(Debug, Clone)]
pub struct ResourceAggregator {
	registry: Arc<EnvironmentRegistry>,
	policy: ResolutionPolicy,
}

impl ResourceAggregator {
	/// Creates an aggregator over the environments `policy` names.
	pub fn new(registry: Arc<EnvironmentRegistry>, policy: ResolutionPolicy) -> Self {
		Self { registry, policy }
	}

	/// Returns the policy whose environment order is searched.
	pub fn policy(&self) -> &ResolutionPolicy {
		&self.policy
	}

	/// Returns the registry the environments are looked up in.
	pub fn registry(&self) -> &Arc<EnvironmentRegistry> {
		&self.registry
	}

	/// Returns the first URL any environment has for `name`.
	pub fn find_one(&self, name: &str) -> Option<Url> {
		self.environments().find_map(|loader| loader.locate_resource(name))
	}

	/// Returns every URL for `name` from the first environment that has at least one.
	///
	/// Environments are not merged: later environments are never consulted once one yields.
	pub fn find_all(&self, name: &str) -> Resources {
		for loader in self.environments() {
			let mut resources = loader.resources(name);
			if resources.peek().is_some() {
				trace!(name, environment = loader.name(), "resources found");
				return resources;
			}
		}
		Resources::empty()
	}

	fn environments(&self) -> impl Iterator<Item = Arc<EnvironmentLoader>> + '_ {
		self.policy.environments().iter().filter_map(|name| self.registry.lookup(name))
	}
}

#[cfg(test)]
mod tests;
