use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::location::{ArtifactLocation, canonicalize, validate_directory};
use crate::spec::{ARCHIVE_SUFFIX, PathSpec, SpecKind};

/// Expands one specification into validated locations.
///
/// Never fails: invalid locations are logged and dropped. Archive globs keep the valid
/// archives in directory-listing order, which is stable for one listing but otherwise
/// unspecified.
pub fn expand(spec: &PathSpec) -> Vec<ArtifactLocation> {
	match spec.kind() {
		SpecKind::Directory => keep(spec, ArtifactLocation::directory(spec.location())),
		SpecKind::SingleArchive => keep(spec, ArtifactLocation::archive(spec.location())),
		SpecKind::ArchiveGlob => expand_archive_glob(spec),
		SpecKind::RemoteUrl => keep(spec, ArtifactLocation::remote(spec.location())),
	}
}

/// Expands every specification in order, concatenating the results.
///
/// Duplicates are kept; collapsing them is the caller's concern.
pub fn expand_all<'a>(specs: impl IntoIterator<Item = &'a PathSpec>) -> Vec<ArtifactLocation> {
	specs.into_iter().flat_map(expand).collect()
}

/// Returns true when `name` ends with the archive suffix, ignoring ASCII case.
pub fn is_archive_name(name: &OsStr) -> bool {
	name.to_string_lossy().to_ascii_lowercase().ends_with(ARCHIVE_SUFFIX)
}

fn keep(spec: &PathSpec, location: crate::Result<ArtifactLocation>) -> Vec<ArtifactLocation> {
	match location {
		Ok(location) => vec![location],
		Err(error) => {
			debug!(spec = %spec, %error, "dropping invalid location");
			Vec::new()
		}
	}
}

fn expand_archive_glob(spec: &PathSpec) -> Vec<ArtifactLocation> {
	let base = match canonicalize(Path::new(spec.location())) {
		Ok(base) => base,
		Err(error) => {
			debug!(spec = %spec, %error, "dropping archive glob");
			return Vec::new();
		}
	};
	if let Err(error) = validate_directory(&base) {
		debug!(spec = %spec, %error, "dropping archive glob");
		return Vec::new();
	}
	let entries = match fs::read_dir(&base) {
		Ok(entries) => entries,
		Err(error) => {
			debug!(spec = %spec, %error, "cannot list archive glob directory");
			return Vec::new();
		}
	};

	entries
		.filter_map(|entry| entry.ok())
		.filter(|entry| is_archive_name(&entry.file_name()))
		.filter_map(|entry| match ArtifactLocation::archive(entry.path()) {
			Ok(location) => Some(location),
			Err(error) => {
				debug!(spec = %spec, %error, "dropping archive");
				None
			}
		})
		.collect()
}
