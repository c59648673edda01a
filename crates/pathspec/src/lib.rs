//! Path specifications and artifact locations.
//!
//! A path specification is one configured string naming where shared artifacts live.
//! [`PathSpec::parse`] derives its [`SpecKind`] from the string's shape, and [`expand`]
//! turns it into zero or more validated [`ArtifactLocation`]s.
//!
//! | Specification | Kind | Expands to |
//! |---|---|---|
//! | `lib/*.zip` | [`SpecKind::ArchiveGlob`] | every readable `*.zip` directly inside `lib/` |
//! | `lib/util.zip` | [`SpecKind::SingleArchive`] | `lib/util.zip` |
//! | `classes/*`, `classes` | [`SpecKind::Directory`] | `classes/` |
//! | `https://host/repo/` | [`SpecKind::RemoteUrl`] | the URL itself |
//!
//! Expansion never fails. Locations that are missing, of the wrong type, or unreadable are
//! dropped (and logged at `debug`), and expansion carries on with the rest.

mod error;
mod expand;
mod location;
mod spec;

pub use error::{LocationError, Result};
pub use expand::{expand, expand_all, is_archive_name};
pub use location::{ArtifactLocation, ENTRY_SEPARATOR, LocationKind, escape_entry_separator};
pub use spec::{PathSpec, SpecKind};
