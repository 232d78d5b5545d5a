//! File path canonicalization for cross-snapshot identity

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Canonicalize a recorded path into a file key
///
/// Leading `../` and `./` segments and leading separators are stripped until
/// none remain, so snapshots recorded from different working directories
/// produce the same key. Pure string manipulation: nothing is resolved on disk.
///
/// # Examples
///
/// ```
/// use size_analyzer::snapshot::normalize_path;
///
/// assert_eq!(normalize_path("../src/a.cpp"), "src/a.cpp");
/// assert_eq!(normalize_path("./src/a.cpp"), "src/a.cpp");
/// assert_eq!(normalize_path("/src/a.cpp"), "src/a.cpp");
/// assert_eq!(normalize_path("src/a.cpp"), "src/a.cpp");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut rest = path;
    loop {
        let stripped = strip_dot_segment(rest, "..")
            .or_else(|| strip_dot_segment(rest, "."))
            .unwrap_or_else(|| rest.trim_start_matches(SEPARATORS));
        if stripped.len() == rest.len() {
            return rest.to_string();
        }
        rest = stripped;
    }
}

fn strip_dot_segment<'a>(path: &'a str, dots: &str) -> Option<&'a str> {
    path.strip_prefix(dots)?.strip_prefix(SEPARATORS)
}

/// Final path segment
pub fn basename(path: &str) -> &str {
    match path.rfind(SEPARATORS) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Everything before the final segment, or `.` for a bare file name
pub fn dirname(path: &str) -> &str {
    match path.rfind(SEPARATORS) {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => ".",
    }
}
