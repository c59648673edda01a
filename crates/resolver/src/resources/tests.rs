use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{Workspace, registry};

#[test]
fn find_one_takes_first_environment_with_the_resource() {
	let ws = Workspace::new();
	let registry = registry(&[
		("E1", vec![ws.directory("e1", &[])]),
		("E2", vec![ws.directory("e2", &[("META-INF/codec", b"e2")])]),
		("E3", vec![ws.directory("e3", &[("META-INF/codec", b"e3")])]),
	]);
	let resources = ResourceAggregator::new(registry.clone(), ResolutionPolicy::new(["E1", "E2", "E3"]));

	let url = resources.find_one("META-INF/codec").expect("resource present");
	assert!(url.as_str().ends_with("/e2/META-INF/codec"));
	assert_eq!(registry.lookup("E3").expect("present").stats().resource_lookups, 0);
	assert_eq!(resources.find_one("META-INF/none"), None);
}

#[test]
fn find_all_returns_first_non_empty_environment_only() {
	let ws = Workspace::new();
	let e2 = vec![
		ws.directory("e2-classes", &[("META-INF/codec", b"dir")]),
		ws.archive("e2-a.zip", &[("META-INF/codec", b"a")]),
		ws.archive("e2-b.zip", &[("META-INF/codec", b"b")]),
	];
	let registry = registry(&[
		("E1", vec![ws.directory("e1", &[("other", b"e1")])]),
		("E2", e2),
		("E3", vec![ws.directory("e3", &[("META-INF/codec", b"e3")])]),
	]);
	let resources = ResourceAggregator::new(registry.clone(), ResolutionPolicy::new(["E1", "E2", "E3"]));

	let mut all = resources.find_all("META-INF/codec");
	assert_eq!(all.environment(), Some("E2"));
	let urls: Vec<_> = all.by_ref().collect();
	assert_eq!(urls.len(), 3);
	assert_eq!(urls[0].scheme(), "file");
	assert!(urls[1].as_str().starts_with("zip:") && urls[1].as_str().contains("e2-a.zip!/"));
	assert!(urls[2].as_str().contains("e2-b.zip!/"));
	assert_eq!(registry.lookup("E3").expect("present").stats().resource_lookups, 0);
}

#[test]
fn find_all_without_matches_is_empty() {
	let ws = Workspace::new();
	let registry = registry(&[("E1", vec![ws.directory("e1", &[])])]);
	let resources = ResourceAggregator::new(registry, ResolutionPolicy::new(["E1", "ghost"]));

	let mut all = resources.find_all("META-INF/codec");
	assert_eq!(all.environment(), None);
	assert!(all.next().is_none());
}

#[test]
fn policy_filters_do_not_apply_to_resources() {
	let ws = Workspace::new();
	let registry = registry(&[("E1", vec![ws.directory("e1", &[("org/example/internal/res.txt", b"e1")])])]);
	let policy = ResolutionPolicy::new(["E1"])
		.delegated(crate::NameFilter::Nothing)
		.excluded(crate::NameFilter::All);
	let resources = ResourceAggregator::new(registry, policy);

	assert!(resources.find_one("org/example/internal/res.txt").is_some());
}
