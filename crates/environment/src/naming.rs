//! Symbolic name to entry path mapping.
//!
//! A symbolic name is dot-separated (`org.example.Widget`). Its entry path replaces the dots
//! with `/` and appends the artifact extension (`org/example/Widget.mod`). Resource names are
//! entry paths already and are used as-is.
//!
//! Entry paths are relative and may not contain empty, `.` or `..` segments, so no name can
//! reach outside the location it is looked up in.

/// Returns the entry path for a symbolic name, or `None` if the name cannot be an entry.
pub fn entry_path(name: &str, extension: &str) -> Option<String> {
	let path = name.replace('.', "/");
	if !is_safe_entry(&path) {
		return None;
	}
	Some(if extension.is_empty() { path } else { format!("{path}.{extension}") })
}

/// Returns true when `entry` is a relative path that stays inside its location.
pub fn is_safe_entry(entry: &str) -> bool {
	!entry.is_empty()
		&& !entry.starts_with('/')
		&& !entry.contains('\\')
		&& entry.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("org.example.Widget", "mod", Some("org/example/Widget.mod"))]
	#[case("Widget", "mod", Some("Widget.mod"))]
	#[case("org.example.Widget", "", Some("org/example/Widget"))]
	#[case("", "mod", None)]
	#[case("org..Widget", "mod", None)]
	#[case(".hidden", "mod", None)]
	#[case("trailing.", "mod", None)]
	fn maps_names(#[case] name: &str, #[case] extension: &str, #[case] expected: Option<&str>) {
		assert_eq!(entry_path(name, extension).as_deref(), expected);
	}

	#[rstest]
	#[case("META-INF/services/codec", true)]
	#[case("a.txt", true)]
	#[case("/etc/passwd", false)]
	#[case("../outside.txt", false)]
	#[case("a/./b", false)]
	#[case("a//b", false)]
	#[case("a\\b", false)]
	#[case("", false)]
	fn entry_safety(#[case] entry: &str, #[case] safe: bool) {
		assert_eq!(is_safe_entry(entry), safe);
	}
}
