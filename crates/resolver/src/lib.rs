//! Consumer-side resolution over shared environments.
//!
//! A consumer owns a [`NamespaceResolver`] built from the process's
//! [`commons_environment::EnvironmentRegistry`], a [`ResolutionPolicy`], and an ancestor scope.
//! The resolver answers symbolic names; its [`ResourceAggregator`] answers resource paths.
//!
//! ```text
//! resolve(name):  cache → ancestor (if first) → environments in order → ancestor (if last)
//! find_one(name): first URL from any environment
//! find_all(name): every URL from the first environment that has one
//! ```

pub mod error;
pub mod policy;
pub mod resolver;
pub mod resources;

#[cfg(test)]
mod fixtures;

pub use error::{PolicyError, ResolveError, Result};
pub use policy::{NameFilter, ResolutionPolicy};
pub use resolver::NamespaceResolver;
pub use resources::ResourceAggregator;
