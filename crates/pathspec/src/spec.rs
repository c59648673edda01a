use std::fmt;

use url::Url;

pub(crate) const ARCHIVE_SUFFIX: &str = ".zip";
const ARCHIVE_GLOB: &str = "*.zip";
const DIRECTORY_GLOB: &str = "/*";

/// Shape of a path specification, derived once from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecKind {
	/// A directory whose contents are artifact entries.
	Directory,
	/// One archive file.
	SingleArchive,
	/// Every archive directly inside a directory.
	ArchiveGlob,
	/// An absolute URL used verbatim.
	RemoteUrl,
}

/// One configured path specification.
///
/// Immutable once parsed. [`PathSpec::location`] is the raw string with any glob marker
/// stripped, which is what validation operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
	raw: String,
	location: String,
	kind: SpecKind,
}

impl PathSpec {
	/// Parses a specification, deriving its kind.
	///
	/// Rules are checked in order: absolute URL, trailing `*.zip`, trailing `.zip`,
	/// trailing `/*`, and finally plain directory.
	pub fn parse(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let (kind, location) = classify(&raw);
		let location = location.to_string();
		Self { raw, location, kind }
	}

	/// Returns the specification exactly as configured.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Returns the location with any glob marker removed.
	pub fn location(&self) -> &str {
		&self.location
	}

	/// Returns the derived kind.
	pub fn kind(&self) -> SpecKind {
		self.kind
	}
}

impl fmt::Display for PathSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl From<&str> for PathSpec {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

impl From<String> for PathSpec {
	fn from(raw: String) -> Self {
		Self::parse(raw)
	}
}

fn classify(raw: &str) -> (SpecKind, &str) {
	if is_remote(raw) {
		return (SpecKind::RemoteUrl, raw);
	}
	if let Some(base) = raw.strip_suffix(ARCHIVE_GLOB) {
		return (SpecKind::ArchiveGlob, base);
	}
	if raw.ends_with(ARCHIVE_SUFFIX) {
		return (SpecKind::SingleArchive, raw);
	}
	if let Some(base) = raw.strip_suffix(DIRECTORY_GLOB) {
		// A bare `/*` leaves an empty base, which means the working directory like `*.zip`.
		return (SpecKind::Directory, base);
	}
	(SpecKind::Directory, raw)
}

// Single-letter schemes are Windows drive prefixes (`C:/lib`), not URLs.
fn is_remote(raw: &str) -> bool {
	raw.contains("://") && Url::parse(raw).is_ok_and(|url| url.scheme().len() > 1)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("/opt/shared/lib/*.zip", SpecKind::ArchiveGlob, "/opt/shared/lib/")]
	#[case("*.zip", SpecKind::ArchiveGlob, "")]
	#[case("/opt/shared/lib/util.zip", SpecKind::SingleArchive, "/opt/shared/lib/util.zip")]
	#[case("/opt/shared/classes/*", SpecKind::Directory, "/opt/shared/classes")]
	#[case("/opt/shared/classes", SpecKind::Directory, "/opt/shared/classes")]
	#[case("/*", SpecKind::Directory, "")]
	#[case("lib/UTIL.ZIP", SpecKind::Directory, "lib/UTIL.ZIP")]
	#[case("https://repo.example.com/shared/", SpecKind::RemoteUrl, "https://repo.example.com/shared/")]
	#[case("https://repo.example.com/lib/*.zip", SpecKind::RemoteUrl, "https://repo.example.com/lib/*.zip")]
	fn derives_kind(#[case] raw: &str, #[case] kind: SpecKind, #[case] location: &str) {
		let spec = PathSpec::parse(raw);
		assert_eq!(spec.kind(), kind);
		assert_eq!(spec.location(), location);
		assert_eq!(spec.raw(), raw);
	}

	#[test]
	fn drive_prefix_is_not_a_url() {
		assert_eq!(PathSpec::parse("C:/shared/lib").kind(), SpecKind::Directory);
		assert_eq!(PathSpec::parse("C://shared/lib/*.zip").kind(), SpecKind::ArchiveGlob);
	}

	#[test]
	fn display_is_raw_text() {
		assert_eq!(PathSpec::from("lib/*").to_string(), "lib/*");
	}
}
