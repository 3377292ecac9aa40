//! Public URL path utilities.
//!
//! Public paths are always `/`-separated regardless of platform.

/// Characters that are not allowed in a path segment on common filesystems.
const UNSAFE_CHARS: [char; 8] = ['<', '>', ':', '"', '\\', '|', '?', '*'];

/// Join URL path parts with `/`.
///
/// Empty parts are dropped and repeated slashes collapsed. A leading `/` on the
/// first non-empty part is kept, trailing slashes are not.
///
/// # Examples
/// ```ignore
/// assert_eq!(join_path(&["", "blog", "", "index"]), "blog/index");
/// assert_eq!(join_path(&["/assets", "thumbnails/", "/img.png"]), "/assets/thumbnails/img.png");
/// ```
pub fn join_path<S: AsRef<str>>(parts: &[S]) -> String {
    let mut leading = None;
    let segments: Vec<&str> = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .inspect(|p| {
            leading.get_or_insert(p.starts_with('/'));
        })
        .flat_map(|p| p.split('/'))
        .filter(|s| !s.is_empty())
        .collect();

    let joined = segments.join("/");
    if leading == Some(true) {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Ensure a public path starts with exactly one `/`.
#[inline]
pub fn ensure_leading_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Check if a reference is a remote http(s) URL.
pub fn is_remote(reference: &str) -> bool {
    url::Url::parse(reference).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
