//! POSIX shell quoting for printed commands

use std::borrow::Cow;
use std::path::Path;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}

/// Quote a path so a POSIX shell reads it back as a single word
///
/// Paths made only of safe characters are returned unchanged; anything else
/// is wrapped in single quotes, with embedded single quotes closed, escaped
/// and reopened.
#[must_use]
pub fn quote(path: &Path) -> Cow<'_, str> {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Cow::Borrowed("''");
    }
    if text.chars().all(is_safe) {
        return text;
    }
    Cow::Owned(format!("'{}'", text.replace('\'', r#"'"'"'"#)))
}

/// Quote each path and join them with single spaces
#[must_use]
pub fn quote_all<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| quote(p.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
