//! Accessor paths for error messages.
//!
//! A path is a plain string (`root.profile.tags[2]`) threaded through nested
//! parser calls. Each nesting level derives a new string; parent paths are
//! never mutated in place.

/// Path assigned to the top-level value of a parse.
pub const ROOT: &str = "root";

/// Derive the path of a named member.
///
/// # Examples
///
/// ```
/// use nuages::path;
///
/// assert_eq!(path::key(path::ROOT, "name"), "root.name");
/// ```
pub fn key(parent: &str, key: &str) -> String {
	format!("{parent}.{key}")
}

/// Derive the path of a sequence element.
///
/// # Examples
///
/// ```
/// use nuages::path;
///
/// assert_eq!(path::index("root.tags", 2), "root.tags[2]");
/// ```
pub fn index(parent: &str, index: usize) -> String {
	format!("{parent}[{index}]")
}
