//! Tag value sanitization for folder and file names

/// Strip path separators from a tag value
///
/// Removes every `/` and `\`, collapses whitespace runs to a single space
/// and trims. Idempotent.
pub fn sanitize(text: &str) -> String {
    text.replace(['/', '\\'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
