//! Consumer resolution policy.

use std::fmt;
use std::sync::Arc;

use commons_config::ConsumerDef;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::PolicyError;

/// A predicate over symbolic names.
#[derive(Clone)]
pub enum NameFilter {
	/// Matches every name.
	All,
	/// Matches no name.
	Nothing,
	/// Matches names against glob patterns (`org.example.*`).
	Patterns(GlobSet),
	/// Matches names with a host-supplied predicate.
	Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl NameFilter {
	/// Compiles glob patterns. An empty list matches nothing; a bare `*` matches everything.
	pub fn patterns<I, S>(patterns: I) -> Result<Self, PolicyError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = GlobSetBuilder::new();
		let mut empty = true;
		for pattern in patterns {
			let pattern = pattern.as_ref();
			if pattern == "*" {
				return Ok(NameFilter::All);
			}
			let glob = Glob::new(pattern).map_err(|source| PolicyError::InvalidPattern {
				pattern: pattern.to_string(),
				source,
			})?;
			builder.add(glob);
			empty = false;
		}
		if empty {
			return Ok(NameFilter::Nothing);
		}
		builder.build().map(NameFilter::Patterns).map_err(PolicyError::PatternSet)
	}

	/// Wraps a predicate.
	pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
		NameFilter::Custom(Arc::new(predicate))
	}

	/// Returns true if `name` matches.
	pub fn matches(&self, name: &str) -> bool {
		match self {
			NameFilter::All => true,
			NameFilter::Nothing => false,
			NameFilter::Patterns(set) => set.is_match(name),
			NameFilter::Custom(predicate) => predicate(name),
		}
	}
}

impl fmt::Debug for NameFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NameFilter::All => f.write_str("All"),
			NameFilter::Nothing => f.write_str("Nothing"),
			NameFilter::Patterns(set) => f.debug_tuple("Patterns").field(&set.len()).finish(),
			NameFilter::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// How one consumer resolves names: which environments it sees, in what order, and which names
/// may reach the ancestor scope.
///
/// The default policy sees no environments, asks the ancestor last, and delegates every name.
#[derive(Debug, Clone)]
pub struct ResolutionPolicy {
	environments: Vec<String>,
	ancestor_first: bool,
	delegated: NameFilter,
	excluded: NameFilter,
}

impl Default for ResolutionPolicy {
	fn default() -> Self {
		Self {
			environments: Vec::new(),
			ancestor_first: false,
			delegated: NameFilter::All,
			excluded: NameFilter::Nothing,
		}
	}
}

impl ResolutionPolicy {
	/// A local-first policy over `environments`, searched in the given order.
	pub fn new<I, S>(environments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			environments: environments.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	/// Compiles a configured consumer.
	pub fn from_consumer(def: &ConsumerDef) -> Result<Self, PolicyError> {
		Ok(Self::new(def.environments.iter().cloned())
			.ancestor_first(def.ancestor_first)
			.delegated(NameFilter::patterns(&def.delegated)?)
			.excluded(NameFilter::patterns(&def.excluded)?))
	}

	/// Sets whether the ancestor is asked before the environments.
	pub fn ancestor_first(mut self, ancestor_first: bool) -> Self {
		self.ancestor_first = ancestor_first;
		self
	}

	/// Sets which names may be delegated to the ancestor.
	pub fn delegated(mut self, filter: NameFilter) -> Self {
		self.delegated = filter;
		self
	}

	/// Sets which names are never delegated.
	pub fn excluded(mut self, filter: NameFilter) -> Self {
		self.excluded = filter;
		self
	}

	/// Environment names in search order.
	pub fn environments(&self) -> &[String] {
		&self.environments
	}

	/// Returns true if the ancestor is asked first.
	pub fn is_ancestor_first(&self) -> bool {
		self.ancestor_first
	}

	/// Returns true if the delegation filter matches `name`.
	pub fn is_delegated(&self, name: &str) -> bool {
		self.delegated.matches(name)
	}

	/// Returns true if the exclusion filter matches `name`.
	pub fn is_excluded(&self, name: &str) -> bool {
		self.excluded.matches(name)
	}

	/// Returns true if `name` may be asked of the ancestor scope. Exclusion wins over delegation.
	pub fn delegates(&self, name: &str) -> bool {
		self.is_delegated(name) && !self.is_excluded(name)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(&[], "org.example.Widget", false)]
	#[case(&["*"], "org.example.Widget", true)]
	#[case(&["org.example.*"], "org.example.Widget", true)]
	#[case(&["org.example.*"], "org.example.deep.Widget", true)]
	#[case(&["org.example.*"], "org.other.Widget", false)]
	#[case(&["org.*.Widget", "net.*"], "net.Gadget", true)]
	#[case(&["org.example.Widget"], "org.example.Widget", true)]
	fn patterns_match_dotted_names(#[case] patterns: &[&str], #[case] name: &str, #[case] expected: bool) {
		let filter = NameFilter::patterns(patterns).expect("patterns compile");
		assert_eq!(filter.matches(name), expected);
	}

	#[test]
	fn invalid_pattern_is_reported() {
		let err = NameFilter::patterns(["org.[example"]).unwrap_err();
		assert!(matches!(err, PolicyError::InvalidPattern { pattern, .. } if pattern == "org.[example"));
	}

	#[test]
	fn exclusion_overrides_delegation() {
		let policy = ResolutionPolicy::new(["shared"])
			.delegated(NameFilter::All)
			.excluded(NameFilter::patterns(["org.example.internal.*"]).expect("compiles"));
		assert!(policy.delegates("org.example.Widget"));
		assert!(policy.is_delegated("org.example.internal.Secret"));
		assert!(!policy.delegates("org.example.internal.Secret"));
	}

	#[test]
	fn custom_filter_runs_predicate() {
		let policy = ResolutionPolicy::default().delegated(NameFilter::custom(|name| name.starts_with("java.")));
		assert!(policy.delegates("java.lang.Object"));
		assert!(!policy.delegates("org.example.Widget"));
	}

	#[test]
	fn from_consumer_compiles_configuration() {
		let mut def = ConsumerDef::new("webapp", ["shared", "cxf"]);
		def.ancestor_first = true;
		def.delegated = vec!["java.*".into(), "javax.*".into()];
		def.excluded = vec!["javax.ws.*".into()];

		let policy = ResolutionPolicy::from_consumer(&def).expect("compiles");
		assert_eq!(policy.environments(), ["shared", "cxf"]);
		assert!(policy.is_ancestor_first());
		assert!(policy.delegates("javax.xml.Parser"));
		assert!(!policy.delegates("javax.ws.rs.Path"));
		assert!(!policy.delegates("org.example.Widget"));
	}

	#[test]
	fn default_delegates_everything_last() {
		let policy = ResolutionPolicy::from_consumer(&ConsumerDef::new("plain", Vec::<String>::new())).expect("compiles");
		assert!(!policy.is_ancestor_first());
		assert!(policy.delegates("anything.at.All"));
		assert!(matches!(policy.excluded, NameFilter::Nothing));
	}
}
