use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use commons_config::{Config, EnvironmentDef};
use commons_environment::{Artifact, EmptyScope, EnvironmentRegistry, Resolution, Scope, ScopeError};
use parking_lot::Mutex;
use tempfile::TempDir;
use url::Url;
use zip::write::SimpleFileOptions;

/// Scratch directory holding environment locations.
pub(crate) struct Workspace {
	root: TempDir,
}

impl Workspace {
	pub(crate) fn new() -> Self {
		Self {
			root: tempfile::tempdir().expect("must create tempdir"),
		}
	}

	/// Creates directory `dir` with `entries` and returns its path specification.
	pub(crate) fn directory(&self, dir: &str, entries: &[(&str, &[u8])]) -> String {
		let base = self.root.path().join(dir);
		fs::create_dir_all(&base).expect("must create dir");
		for (entry, bytes) in entries {
			let path = base.join(entry);
			fs::create_dir_all(path.parent().expect("entry has a parent")).expect("must create dirs");
			fs::write(path, bytes).expect("must write entry");
		}
		base.display().to_string()
	}

	/// Creates archive `file` with `entries` and returns its path specification.
	pub(crate) fn archive(&self, file: &str, entries: &[(&str, &[u8])]) -> String {
		let path = self.root.path().join(file);
		let mut zip = zip::ZipWriter::new(fs::File::create(&path).expect("must create archive"));
		let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
		for (entry, bytes) in entries {
			zip.start_file(*entry, options).expect("must start entry");
			zip.write_all(bytes).expect("must write entry");
		}
		zip.finish().expect("must finish archive");
		path.display().to_string()
	}
}

/// Registry with the given environments, all built under an empty ancestor.
pub(crate) fn registry(environments: &[(&str, Vec<String>)]) -> Arc<EnvironmentRegistry> {
	let config = Config {
		environments: environments
			.iter()
			.map(|(name, paths)| EnvironmentDef::new(*name, paths.iter().cloned()))
			.collect(),
		..Config::default()
	};
	let registry = EnvironmentRegistry::new(Arc::new(EmptyScope));
	let report = registry.init(&config);
	assert!(report.failed.is_empty(), "fixture environments must build");
	Arc::new(registry)
}

pub(crate) fn host_artifact(name: &str) -> Artifact {
	let url = Url::parse(&format!("file:///host/{name}.mod")).expect("valid url");
	Artifact::new(name, url, "host", b"host".as_slice())
}

/// Ancestor scope with a fixed set of names, a call counter, and injectable failures.
#[derive(Default)]
pub(crate) struct HostScope {
	artifacts: HashMap<String, Artifact>,
	failing: Mutex<HashSet<String>>,
	calls: AtomicUsize,
}

impl HostScope {
	pub(crate) fn with(names: &[&str]) -> Self {
		Self {
			artifacts: names.iter().map(|name| (name.to_string(), host_artifact(name))).collect(),
			..Self::default()
		}
	}

	/// Makes the next resolution of `name` fail.
	pub(crate) fn fail_once(&self, name: &str) {
		self.failing.lock().insert(name.to_string());
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Scope for HostScope {
	fn resolve(&self, name: &str) -> Result<Resolution, ScopeError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.failing.lock().remove(name) {
			return Err(ScopeError::Failed {
				scope: "host".into(),
				name: name.into(),
				detail: "injected".into(),
			});
		}
		Ok(self.artifacts.get(name).cloned().map_or(Resolution::NotFound, Resolution::Found))
	}

	fn find_resource(&self, name: &str) -> Option<Url> {
		self.artifacts.get(name).map(|artifact| artifact.url().clone())
	}
}
