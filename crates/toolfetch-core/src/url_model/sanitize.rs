//! Linux-safe filename sanitization.

/// Linux NAME_MAX in bytes.
pub const NAME_MAX: usize = 255;

fn is_separator_like(c: char) -> bool {
    c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() || c == '_'
}

/// Sanitizes a candidate filename for safe use on Linux.
///
/// - Maps NUL, `/`, `\`, control characters and whitespace to `_`
/// - Collapses runs of `_` into one
/// - Trims leading/trailing spaces, dots and underscores
/// - Truncates to 255 bytes on a char boundary
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        if is_separator_like(c) {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    truncate_on_char_boundary(trimmed, NAME_MAX).to_string()
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
pub fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
