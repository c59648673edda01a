//! Per-consumer name resolution across shared environments.
//!
//! # Purpose
//!
//! Resolve a symbolic name for one consumer by combining its ancestor scope with the shared
//! environments its [`ResolutionPolicy`] names, and remember the outcome.
//!
//! # Mental model
//!
//! Every name has a slot: a reentrant lock around `Vacant | InProgress | Resolved`.
//!
//! * The first caller moves the slot to `InProgress`, runs the search, then stores the outcome.
//! * Other threads asking for the same name wait on the lock and read the stored outcome.
//! * The same thread asking again while the search runs finds `InProgress` and gets
//!   [`ResolveError::Cycle`] instead of deadlocking.
//!
//! # Invariants
//!
//! * An outcome is computed at most once per name; `NotFound` is remembered too
//!   (see `tests::second_call_is_served_from_cache`).
//! * Errors are never remembered; the slot returns to `Vacant` (see
//!   `tests::ancestor_failure_propagates_and_is_retried`).
//! * An excluded name never reaches the ancestor, whatever the delegation filter says.
//! * Environments missing from the registry are skipped.
//!
//! # Concurrency & ordering
//!
//! * Unrelated names resolve in parallel; the slot table lock is held only to find a slot.
//! * No slot lock is held while another name's slot is acquired except through nested
//!   resolution on the same thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use commons_environment::{EnvironmentRegistry, Lookup, Resolution, Scope, ScopeError};
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace};
use url::Url;

use crate::error::{ResolveError, Result};
use crate::policy::ResolutionPolicy;
use crate::resources::ResourceAggregator;

enum SlotState {
	Vacant,
	InProgress,
	Resolved(Resolution),
}

type NameSlot = ReentrantMutex<RefCell<SlotState>>;

/// Returns the slot to `Vacant` unless an outcome was stored.
struct Pending<'a> {
	state: &'a RefCell<SlotState>,
	settled: bool,
}

impl Pending<'_> {
	fn settle(mut self, resolution: Resolution) {
		*self.state.borrow_mut() = SlotState::Resolved(resolution);
		self.settled = true;
	}
}

impl Drop for Pending<'_> {
	fn drop(&mut self) {
		if !self.settled {
			*self.state.borrow_mut() = SlotState::Vacant;
		}
	}
}

/// One consumer's view of the shared environments.
pub struct NamespaceResolver {
	ancestor: Arc<dyn Scope>,
	resources: ResourceAggregator,
	slots: Mutex<HashMap<Arc<str>, Arc<NameSlot>>>,
}

impl NamespaceResolver {
	/// Creates a resolver with an empty cache over `registry`, delegating to `ancestor`.
	pub fn new(registry: Arc<EnvironmentRegistry>, policy: ResolutionPolicy, ancestor: Arc<dyn Scope>) -> Self {
		Self {
			ancestor,
			resources: ResourceAggregator::new(registry, policy),
			slots: Mutex::new(HashMap::new()),
		}
	}

	/// Returns the consumer's policy.
	pub fn policy(&self) -> &ResolutionPolicy {
		self.resources.policy()
	}

	/// Returns the registry the environments are looked up in.
	pub fn registry(&self) -> &Arc<EnvironmentRegistry> {
		self.resources.registry()
	}

	/// Resource lookups over the same environments.
	pub fn resources(&self) -> &ResourceAggregator {
		&self.resources
	}

	/// Resolves `name`, serving repeated requests from this consumer's cache.
	pub fn resolve(&self, name: &str) -> Result<Resolution> {
		let slot = self.slot(name);
		let guard = slot.lock();
		{
			let mut state = guard.borrow_mut();
			match std::mem::replace(&mut *state, SlotState::InProgress) {
				SlotState::Vacant => {}
				SlotState::InProgress => {
					debug!(name, "resolution re-entered itself");
					return Err(ResolveError::Cycle { name: name.to_string() });
				}
				SlotState::Resolved(resolution) => {
					*state = SlotState::Resolved(resolution.clone());
					return Ok(resolution);
				}
			}
		}

		let pending = Pending {
			state: &guard,
			settled: false,
		};
		let resolution = self.search(name)?;
		pending.settle(resolution.clone());
		Ok(resolution)
	}

	fn slot(&self, name: &str) -> Arc<NameSlot> {
		let mut slots = self.slots.lock();
		if let Some(slot) = slots.get(name) {
			return Arc::clone(slot);
		}
		let slot = Arc::new(ReentrantMutex::new(RefCell::new(SlotState::Vacant)));
		slots.insert(Arc::from(name), Arc::clone(&slot));
		slot
	}

	fn search(&self, name: &str) -> Result<Resolution> {
		let policy = self.policy();
		let delegates = policy.delegates(name);
		if delegates && policy.is_ancestor_first() {
			if let found @ Resolution::Found(_) = self.ancestor.resolve(name)? {
				trace!(name, "resolved by ancestor");
				return Ok(found);
			}
		}

		for environment in policy.environments() {
			let Some(loader) = self.registry().lookup(environment) else {
				trace!(name, environment, "environment absent");
				continue;
			};
			match loader.lookup(name) {
				Lookup::Found(artifact) => {
					trace!(name, environment = loader.name(), "resolved by environment");
					return Ok(Resolution::Found(artifact));
				}
				Lookup::NotFound => trace!(name, environment = loader.name(), "not in environment"),
				Lookup::StructuralFailure(detail) => {
					trace!(name, environment = loader.name(), %detail, "environment failed to provide");
				}
			}
		}

		if delegates && !policy.is_ancestor_first() {
			if let found @ Resolution::Found(_) = self.ancestor.resolve(name)? {
				trace!(name, "resolved by ancestor");
				return Ok(found);
			}
		}
		Ok(Resolution::NotFound)
	}
}

impl std::fmt::Debug for NamespaceResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NamespaceResolver")
			.field("policy", self.policy())
			.field("cached", &self.slots.lock().len())
			.finish_non_exhaustive()
	}
}

/// Lets another consumer or environment use this consumer as its ancestor.
impl Scope for NamespaceResolver {
	fn resolve(&self, name: &str) -> std::result::Result<Resolution, ScopeError> {
		NamespaceResolver::resolve(self, name).map_err(ScopeError::from)
	}

	fn find_resource(&self, name: &str) -> Option<Url> {
		self.resources.find_one(name)
	}

	fn find_resources(&self, name: &str) -> Vec<Url> {
		self.resources.find_all(name).collect()
	}
}
