//! Dotted-path composition helpers.
//!
//! A path is an ordered sequence of non-empty segments joined by `.`. The
//! separator is reserved for composition: a single node name must never
//! contain it.

/// Segment separator within a path.
pub const SEPARATOR: char = '.';

/// Join segments into a path, dropping empty segments.
pub fn build_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        if !path.is_empty() {
            path.push(SEPARATOR);
        }
        path.push_str(segment);
    }
    path
}

/// Join a base path and a relative path or name. Either side may be empty.
pub fn join(base: &str, name: &str) -> String {
    build_path([base, name])
}

/// The path one level up, or the empty (root) path for a single segment.
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// True for the empty path, which addresses the whole tree.
pub fn is_root(path: &str) -> bool {
    path.is_empty()
}

/// Iterate the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}
