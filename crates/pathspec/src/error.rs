//! Error types for location validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a location is rejected during validation.
///
/// These never escape [`crate::expand`]; they exist so the dropped location can be logged
/// with a precise cause, and for callers validating a single location directly.
#[derive(Debug, Error)]
pub enum LocationError {
	/// The path could not be resolved to a canonical absolute path.
	#[error("cannot canonicalize {path}: {source}")]
	Canonicalize {
		/// Path as configured.
		path: PathBuf,
		/// The underlying I/O error.
		source: io::Error,
	},

	/// A directory was required.
	#[error("{path} is not a directory")]
	NotADirectory {
		/// Canonical path.
		path: PathBuf,
	},

	/// A regular file was required.
	#[error("{path} is not a regular file")]
	NotAFile {
		/// Canonical path.
		path: PathBuf,
	},

	/// The location exists but cannot be read.
	#[error("{path} is not readable: {source}")]
	Unreadable {
		/// Canonical path.
		path: PathBuf,
		/// The underlying I/O error.
		source: io::Error,
	},

	/// The path has no `file:` URL form.
	#[error("{path} cannot be expressed as a file URL")]
	NotAbsolute {
		/// Canonical path.
		path: PathBuf,
	},

	/// A remote location is not a valid URL.
	#[error("invalid location URL {location}: {source}")]
	InvalidUrl {
		/// Location text after separator escaping.
		location: String,
		/// The underlying parse error.
		source: url::ParseError,
	},
}

/// Result type for location validation.
pub type Result<T> = std::result::Result<T, LocationError>;
