//! Logical document paths
//!
//! Paths in the remote repository are posix-separated and relative to the
//! repository root. User input may carry backslashes, duplicated separators or
//! leading/trailing slashes; everything is normalized before it reaches the
//! remote API. None of these functions touch the network or the file system.

const SEPARATOR: char = '/';

/// Canonical form of a repository path
///
/// Backslashes become forward slashes, empty segments are dropped (which strips
/// leading and trailing slashes). Total and idempotent.
pub fn normalize(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `path` lies strictly beneath `root`
///
/// A path equal to `root` is not under it. The empty root (repository root)
/// contains every non-empty path.
pub fn is_under(root: &str, path: &str) -> bool {
    let root = normalize(root);
    let path = normalize(path);

    if root.is_empty() {
        return !path.is_empty();
    }

    path.strip_prefix(&root)
        .is_some_and(|rest| rest.starts_with(SEPARATOR) && rest.len() > 1)
}

/// Concatenate `root` and `relative` with a single separator, then normalize
pub fn join(root: &str, relative: &str) -> String {
    normalize(&format!("{}{}{}", root, SEPARATOR, relative))
}

/// Path of `path` as seen from the directory `base`, using `..` where needed
pub fn relative_to(base: &str, path: &str) -> String {
    let base = normalize(base);
    let path = normalize(path);
    let base_segments = base.split(SEPARATOR).filter(|s| !s.is_empty()).collect::<Vec<_>>();
    let path_segments = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect::<Vec<_>>();

    let common = base_segments
        .iter()
        .zip(path_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    std::iter::repeat_n("..", base_segments.len() - common)
        .chain(path_segments[common..].iter().copied())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether the path contains `.` or `..` segments
pub fn has_relative_segments(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| segment == "." || segment == "..")
}
