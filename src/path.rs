//! Base-path composition.

/// Join a base prefix and a route pathname with exactly one `/` between them
///
/// - an empty `base` returns `path` untouched
/// - a base without a leading `/` gains one
/// - trailing `/`s on the base and leading `/`s on the path collapse into one
/// - an empty `path` leaves the normalized base as-is
///
/// ```rust
/// use routechain::path::concat_path;
///
/// assert_eq!(concat_path("/api", "/users"), "/api/users");
/// assert_eq!(concat_path("/api", "/"), "/api/");
/// assert_eq!(concat_path("/api", "*"), "/api/*");
/// ```
#[must_use]
pub fn concat_path(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }

    // A base of "/" trims to nothing and contributes only the separator
    let base = base.trim_end_matches('/');
    let mut joined = String::with_capacity(base.len() + path.len() + 2);
    if !base.is_empty() && !base.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(base);

    if path.is_empty() {
        if joined.is_empty() {
            joined.push('/');
        }
        return joined;
    }

    joined.push('/');
    joined.push_str(path.trim_start_matches('/'));
    joined
}
