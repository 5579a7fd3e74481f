//! Path normalization.
//!
//! Paths are resolved in two steps. [`absolutize`] anchors a path at the
//! working directory; [`segments`] splits it and folds `..` away. Walking
//! the resulting segments against the tree is done by
//! [`crate::VirtualFs`].

/// Path separator.
pub const SEPARATOR: char = '/';

/// The root directory.
pub const ROOT: &str = "/";

/// Working directory after a reset, and the target of a bare `cd`.
pub const HOME: &str = "/home/anon";

/// Make `path` absolute relative to `cwd` and strip one trailing separator.
pub fn absolutize(cwd: &str, path: &str) -> String {
    let mut abs = if path.starts_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{cwd}{SEPARATOR}{path}")
    };
    if abs.len() > 1 && abs.ends_with(SEPARATOR) {
        abs.pop();
    }
    abs
}

/// Split an absolute path into named segments with `..` folded away.
///
/// Each `..` removes itself and the segment before it. A `..` with nothing
/// before it is dropped on its own, so the result never climbs above root.
/// Empty and `.` segments are ignored. An empty result means root.
pub fn segments(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path
        .split(SEPARATOR)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    while let Some(i) = parts.iter().position(|s| *s == "..") {
        if i == 0 {
            parts.remove(0);
        } else {
            parts.drain(i - 1..=i);
        }
    }
    parts
}

/// Rebuild an absolute path from segments.
pub fn join(segments: &[&str]) -> String {
    if segments.is_empty() {
        return ROOT.to_string();
    }
    let mut out = String::new();
    for seg in segments {
        out.push(SEPARATOR);
        out.push_str(seg);
    }
    out
}

/// Collapse runs of separators, for showing a path back to the user.
pub fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for ch in path.chars() {
        if ch == SEPARATOR {
            if !prev_sep {
                out.push(ch);
            }
            prev_sep = true;
        } else {
            out.push(ch);
            prev_sep = false;
        }
    }
    out
}
