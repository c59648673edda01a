use std::borrow::Cow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{LocationError, Result};

/// Separator between an archive URL and an entry path inside it.
pub const ENTRY_SEPARATOR: &str = "!/";
const ESCAPED_ENTRY_SEPARATOR: &str = "%21/";

/// What a validated location points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
	/// A readable directory.
	Directory,
	/// A readable archive file.
	Archive,
	/// A URL that is not validated against the local filesystem.
	Remote,
}

impl std::fmt::Display for LocationKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LocationKind::Directory => "directory",
			LocationKind::Archive => "archive",
			LocationKind::Remote => "remote",
		})
	}
}

/// A validated, canonical artifact location and its loadable URL.
///
/// Constructing one proves the location existed and was readable at validation time. The URL
/// never contains an unescaped [`ENTRY_SEPARATOR`], so it can safely be used as the base of
/// entry URLs inside archives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactLocation {
	kind: LocationKind,
	path: Option<PathBuf>,
	url: Url,
}

impl ArtifactLocation {
	/// Validates `path` as a readable directory.
	pub fn directory(path: impl AsRef<Path>) -> Result<Self> {
		let path = canonicalize(path.as_ref())?;
		validate_directory(&path)?;
		let url = Url::from_directory_path(&path).map_err(|()| LocationError::NotAbsolute { path: path.clone() })?;
		Ok(Self {
			kind: LocationKind::Directory,
			url: escaped(url)?,
			path: Some(path),
		})
	}

	/// Validates `path` as a readable archive file.
	pub fn archive(path: impl AsRef<Path>) -> Result<Self> {
		let path = canonicalize(path.as_ref())?;
		validate_file(&path)?;
		let url = Url::from_file_path(&path).map_err(|()| LocationError::NotAbsolute { path: path.clone() })?;
		Ok(Self {
			kind: LocationKind::Archive,
			url: escaped(url)?,
			path: Some(path),
		})
	}

	/// Parses a remote URL location.
	pub fn remote(location: &str) -> Result<Self> {
		let location = escape_entry_separator(location);
		let url = Url::parse(&location).map_err(|source| LocationError::InvalidUrl {
			location: location.clone().into_owned(),
			source,
		})?;
		Ok(Self {
			kind: LocationKind::Remote,
			path: None,
			url,
		})
	}

	/// Returns what the location points at.
	pub fn kind(&self) -> LocationKind {
		self.kind
	}

	/// Returns the canonical filesystem path, if the location is local.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Returns the loadable URL.
	pub fn url(&self) -> &Url {
		&self.url
	}
}

/// Percent-escapes every [`ENTRY_SEPARATOR`] in `url`.
pub fn escape_entry_separator(url: &str) -> Cow<'_, str> {
	if url.contains(ENTRY_SEPARATOR) {
		Cow::Owned(url.replace(ENTRY_SEPARATOR, ESCAPED_ENTRY_SEPARATOR))
	} else {
		Cow::Borrowed(url)
	}
}

fn escaped(url: Url) -> Result<Url> {
	if !url.as_str().contains(ENTRY_SEPARATOR) {
		return Ok(url);
	}
	let location = url.as_str().replace(ENTRY_SEPARATOR, ESCAPED_ENTRY_SEPARATOR);
	Url::parse(&location).map_err(|source| LocationError::InvalidUrl { location, source })
}

pub(crate) fn canonicalize(path: &Path) -> Result<PathBuf> {
	// An empty base (`*.zip`) means the working directory.
	let path = if path.as_os_str().is_empty() { Path::new(".") } else { path };
	fs::canonicalize(path).map_err(|source| LocationError::Canonicalize {
		path: path.to_path_buf(),
		source,
	})
}

pub(crate) fn validate_directory(path: &Path) -> Result<()> {
	let meta = fs::metadata(path).map_err(|source| unreadable(path, source))?;
	if !meta.is_dir() {
		return Err(LocationError::NotADirectory { path: path.to_path_buf() });
	}
	fs::read_dir(path).map_err(|source| unreadable(path, source))?;
	Ok(())
}

fn validate_file(path: &Path) -> Result<()> {
	let meta = fs::metadata(path).map_err(|source| unreadable(path, source))?;
	if !meta.is_file() {
		return Err(LocationError::NotAFile { path: path.to_path_buf() });
	}
	File::open(path).map_err(|source| unreadable(path, source))?;
	Ok(())
}

fn unreadable(path: &Path, source: std::io::Error) -> LocationError {
	LocationError::Unreadable {
		path: path.to_path_buf(),
		source,
	}
}
