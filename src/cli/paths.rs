//! Lexical path arithmetic on forward-slash strings.
//!
//! Every path the driver stores, compares, or hands to its collaborators goes
//! through these helpers, so all of them produce the canonical forward-slash
//! form. Nothing here touches the filesystem.

/// Replace every backslash with a forward slash.
pub fn switch_to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Length of the root prefix (`/`, `C:/` or `C:`), or 0 for relative paths.
fn root_length(path: &str) -> usize {
    let bytes = path.as_bytes();
    match bytes {
        [b'/', ..] => 1,
        [drive, b':', b'/', ..] if drive.is_ascii_alphabetic() => 3,
        [drive, b':', ..] if drive.is_ascii_alphabetic() => 2,
        _ => 0,
    }
}

pub fn is_rooted(path: &str) -> bool {
    root_length(&switch_to_forward_slashes(path)) > 0
}

/// Split a path into its root and its non-empty segments, without resolving
/// `.` or `..`.
fn split_root(path: &str) -> (&str, impl Iterator<Item = &str>) {
    let (root, rest) = path.split_at(root_length(path));
    (root, rest.split('/').filter(|segment| !segment.is_empty()))
}

/// Canonical form: forward slashes, no empty or `.` segments, `..` folded into
/// its parent where one exists. Leading `..` segments of a relative path are
/// kept; `..` above a root is dropped. An empty relative result is `.`.
pub fn normalize(path: &str) -> String {
    let path = switch_to_forward_slashes(path);
    let (root, segments) = split_root(&path);
    let mut kept: Vec<&str> = Vec::new();

    for segment in segments {
        match segment {
            "." => {}
            ".." => {
                if kept.last().is_some_and(|last| *last != "..") {
                    kept.pop();
                } else if root.is_empty() {
                    kept.push("..");
                }
            }
            _ => kept.push(segment),
        }
    }

    let joined = kept.join("/");
    if root.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{root}{joined}")
    }
}

/// Join two paths and normalize the result. A rooted `right` is still
/// appended, not substituted.
pub fn combine(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => normalize(right),
        (false, true) => normalize(left),
        (false, false) => normalize(&format!("{left}/{right}")),
    }
}

/// Resolve `segments` right-to-left against `cwd` until a rooted path is
/// formed. Empty segments are ignored.
pub fn resolve(cwd: &str, segments: &[&str]) -> String {
    let mut resolved = switch_to_forward_slashes(cwd);
    for segment in segments.iter().filter(|segment| !segment.is_empty()) {
        if is_rooted(segment) {
            resolved = switch_to_forward_slashes(segment);
        } else {
            resolved = format!("{resolved}/{segment}");
        }
    }
    normalize(&resolved)
}

/// Path that leads from `from` to `to`. Both should be in the same form
/// (both absolute, or both relative to the same directory); an empty string
/// means they are the same location.
pub fn relative(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    if from == to {
        return String::new();
    }

    let (from_root, from_segments) = split_root(&from);
    let (to_root, to_segments) = split_root(&to);
    if !from_root.eq_ignore_ascii_case(to_root) {
        return to.clone();
    }

    let from_segments: Vec<&str> = from_segments.filter(|s| *s != ".").collect();
    let to_segments: Vec<&str> = to_segments.filter(|s| *s != ".").collect();
    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_segments.len() - common];
    parts.extend_from_slice(&to_segments[common..]);
    parts.join("/")
}

/// Parent directory of `path`, or `None` when `path` is already a root (or
/// `.`), where asking for the parent would just return the same path.
pub fn dir_name(path: &str) -> Option<String> {
    let path = switch_to_forward_slashes(path);
    let root_len = root_length(&path);
    let trimmed = path.trim_end_matches('/');
    let trimmed = if trimmed.len() < root_len {
        &path[..root_len]
    } else {
        trimmed
    };

    let parent = match trimmed[root_len..].rfind('/') {
        Some(index) => {
            let parent = &trimmed[..root_len + index];
            if parent.len() <= root_len {
                trimmed[..root_len].to_string()
            } else {
                parent.to_string()
            }
        }
        None if root_len > 0 => trimmed[..root_len].to_string(),
        None => ".".to_string(),
    };

    if parent == trimmed || (trimmed.is_empty() && parent == ".") {
        None
    } else {
        Some(parent)
    }
}

/// Final segment of `path`.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rfind(['/', '\\'])
        .map_or(trimmed, |index| &trimmed[index + 1..])
}

/// Extension of the final segment including the dot (`.js`), or `""`.
pub fn extension(path: &str) -> &str {
    let name = base_name(path);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(index) => &name[index..],
    }
}

/// Strip one pair of matching surrounding quotes.
pub fn strip_quotes(path: &str) -> &str {
    let bytes = path.as_bytes();
    match bytes {
        [first, .., last] if (*first == b'"' || *first == b'\'') && first == last => {
            &path[1..path.len() - 1]
        }
        _ => path,
    }
}
