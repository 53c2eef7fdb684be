//! Filename stem sanitization for asset names.

/// Longest stem kept, in characters.
const STEM_MAX: usize = 40;

/// Sanitizes a filename stem to `[A-Za-z0-9._-]`.
///
/// - Replaces each run of other characters with a single `_`
/// - Trims leading/trailing dots and underscores
/// - Limits length to 40 characters
pub fn sanitize_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            out.push(c);
            prev_underscore = c == '_';
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    out.trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(STEM_MAX)
        .collect()
}
