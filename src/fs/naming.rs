//! Filesystem-safe naming.

/// Replacement for every disallowed character.
const REPLACEMENT: char = '_';

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' ')
}

/// Map an arbitrary display name to a safe path component.
///
/// Keeps ASCII letters, digits, `_`, `-`, `.` and space; every other
/// character becomes `_`. A name made only of dots (which would address the
/// current or parent directory) has its dots replaced too, and an empty name
/// becomes `_`. Total and idempotent.
pub fn sanitize_name(name: &str) -> String {
    if name.is_empty() {
        return REPLACEMENT.to_string();
    }

    let sanitized: String = name
        .chars()
        .map(|c| if is_allowed(c) { c } else { REPLACEMENT })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        return REPLACEMENT.to_string().repeat(sanitized.len());
    }

    sanitized
}
