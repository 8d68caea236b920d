//! Media path helpers.
//!
//! Images are stored as paths relative to the media root (`productos/x.jpg`)
//! and exposed as absolute URLs under a configurable base.

/// Join a stored media path onto `base_url`. Empty paths have no URL;
/// paths that are already absolute URLs are returned unchanged.
pub fn absolute_url(base_url: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Inverse of [`absolute_url`]: strip `base_url` to recover the stored path.
pub fn relative_path(base_url: &str, url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match url.strip_prefix(base) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => url.to_string(),
    }
}
