//! Entry access for one validated location.

use std::fs::{self, File};
use std::io::Read;
use std::sync::OnceLock;

use commons_pathspec::{ArtifactLocation, ENTRY_SEPARATOR, LocationKind};
use parking_lot::Mutex;
use url::Url;
use zip::ZipArchive;
use zip::result::ZipError;

/// Largest archive entry read into memory. Larger entries are structural failures.
pub(crate) const MAX_ENTRY_SIZE: u64 = 64 * 1024 * 1024;

/// An entry read from a location.
pub(crate) struct Entry {
	pub(crate) url: Url,
	pub(crate) bytes: Vec<u8>,
}

/// One location of an environment plus its lazily opened archive.
///
/// Archives are opened on first use and the outcome is kept, so a corrupt archive is reported
/// on every lookup rather than reopened.
pub(crate) struct Source {
	location: ArtifactLocation,
	archive: OnceLock<Result<Mutex<ZipArchive<File>>, String>>,
}

impl Source {
	pub(crate) fn new(location: ArtifactLocation) -> Self {
		Self {
			location,
			archive: OnceLock::new(),
		}
	}

	pub(crate) fn location(&self) -> &ArtifactLocation {
		&self.location
	}

	/// Reads `entry`. `Ok(None)` means the location has no such entry.
	pub(crate) fn read(&self, entry: &str) -> Result<Option<Entry>, String> {
		match self.location.kind() {
			LocationKind::Directory => self.read_file(entry),
			LocationKind::Archive => self.read_archived(entry),
			// Fetching remote locations belongs to the host; they never provide entries here.
			LocationKind::Remote => Ok(None),
		}
	}

	/// Returns the URL of `entry` if the location has it, without reading it.
	pub(crate) fn locate(&self, entry: &str) -> Option<Url> {
		match self.location.kind() {
			LocationKind::Directory => {
				let path = self.location.path()?.join(entry);
				if path.is_file() { entry_url(self.location.url(), entry).ok() } else { None }
			}
			LocationKind::Archive => {
				let archive = self.archive().ok()?;
				let present = archive.lock().index_for_name(entry).is_some();
				if present { self.archived_url(entry).ok() } else { None }
			}
			LocationKind::Remote => None,
		}
	}

	fn read_file(&self, entry: &str) -> Result<Option<Entry>, String> {
		let Some(root) = self.location.path() else {
			return Ok(None);
		};
		let path = root.join(entry);
		if !path.is_file() {
			return Ok(None);
		}
		let bytes = fs::read(&path).map_err(|error| format!("{}: {error}", path.display()))?;
		let url = entry_url(self.location.url(), entry)?;
		Ok(Some(Entry { url, bytes }))
	}

	fn read_archived(&self, entry: &str) -> Result<Option<Entry>, String> {
		let bytes = {
			let mut archive = self.archive()?.lock();
			let mut file = match archive.by_name(entry) {
				Ok(file) => file,
				Err(ZipError::FileNotFound) => return Ok(None),
				Err(error) => return Err(format!("{} entry {entry}: {error}", self.location.url())),
			};
			// The declared size comes from the archive itself and is not trusted for allocation.
			if file.size() > MAX_ENTRY_SIZE {
				return Err(format!(
					"{} entry {entry}: declared size {} exceeds {MAX_ENTRY_SIZE} bytes",
					self.location.url(),
					file.size()
				));
			}
			let mut bytes = Vec::new();
			(&mut file)
				.take(MAX_ENTRY_SIZE + 1)
				.read_to_end(&mut bytes)
				.map_err(|error| format!("{} entry {entry}: {error}", self.location.url()))?;
			if bytes.len() as u64 > MAX_ENTRY_SIZE {
				return Err(format!("{} entry {entry}: exceeds {MAX_ENTRY_SIZE} bytes", self.location.url()));
			}
			bytes
		};
		let url = self.archived_url(entry)?;
		Ok(Some(Entry { url, bytes }))
	}

	fn archived_url(&self, entry: &str) -> Result<Url, String> {
		let archive = self.location.url();
		let joined = entry_url(archive, entry)?;
		// `joined` is the archive URL followed by `/` and the encoded entry.
		let encoded = joined.as_str().get(archive.as_str().len() + 1..).unwrap_or_default();
		Url::parse(&format!("zip:{archive}{ENTRY_SEPARATOR}{encoded}")).map_err(|error| error.to_string())
	}

	fn archive(&self) -> Result<&Mutex<ZipArchive<File>>, String> {
		self.archive.get_or_init(|| self.open_archive()).as_ref().map_err(Clone::clone)
	}

	fn open_archive(&self) -> Result<Mutex<ZipArchive<File>>, String> {
		let path = self.location.path().ok_or_else(|| format!("{} is not a local archive", self.location.url()))?;
		let file = File::open(path).map_err(|error| format!("{}: {error}", path.display()))?;
		let archive = ZipArchive::new(file).map_err(|error| format!("{}: {error}", path.display()))?;
		Ok(Mutex::new(archive))
	}
}

/// Appends `entry`'s segments to `base`, percent-encoding each one.
fn entry_url(base: &Url, entry: &str) -> Result<Url, String> {
	let mut url = base.clone();
	url.path_segments_mut()
		.map_err(|()| format!("{base} cannot hold entry paths"))?
		.pop_if_empty()
		.extend(entry.split('/'));
	Ok(url)
}
