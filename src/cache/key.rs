//! Cache key derivation.
//!
//! A key names a stage output by three things: the bundle identity (its
//! ordered source paths), the tags applied so far and a digest of the bytes
//! the stage reads. The readable prefix only helps when browsing the cache
//! directory; uniqueness comes from the digest.
//!
//! ```text
//! assets-main-scss__fingerprinted_compiled__9f2c4e...
//! ```

use std::fmt;

use crate::utils::hash::digest;
use crate::utils::path::slugify;

/// Longest readable prefix kept from the bundle key.
const PREFIX_MAX: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key for `base` (joined source paths) after `tags`, reading `input`.
    pub fn new<T: AsRef<str>>(base: &str, tags: &[T], input: &[u8]) -> Self {
        let tags: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
        let tags = tags.join("_");
        let hash = digest(&[base.as_bytes(), tags.as_bytes(), input]);

        let mut prefix = slugify(base);
        if prefix.len() > PREFIX_MAX {
            prefix.truncate(PREFIX_MAX);
            prefix.truncate(prefix.trim_end_matches('-').len());
        }

        let key = match (prefix.is_empty(), tags.is_empty()) {
            (true, true) => hash,
            (true, false) => format!("{tags}__{hash}"),
            (false, true) => format!("{prefix}__{hash}"),
            (false, false) => format!("{prefix}__{tags}__{hash}"),
        };
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = CacheKey::new("css/main.scss", &["compiled"], b"a { b: c }");
        let parts: Vec<_> = key.as_str().split("__").collect();
        assert_eq!(parts[0], "css-main-scss");
        assert_eq!(parts[1], "compiled");
        assert_eq!(parts[2].len(), 32);
    }

    #[test]
    fn test_key_is_stable() {
        let a = CacheKey::new("a.js_b.js", &["minified"], b"let a = 1;");
        let b = CacheKey::new("a.js_b.js", &["minified"], b"let a = 1;");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_changes_with_content() {
        let before = CacheKey::new("main.scss", &["compiled"], b"$c: red;");
        let after = CacheKey::new("main.scss", &["compiled"], b"$c: blue;");
        assert_ne!(before, after);
    }

    #[test]
    fn test_key_changes_with_tags() {
        let one = CacheKey::new("img.png", &["optimized"], b"x");
        let two = CacheKey::new("img.png", &["1200x", "optimized"], b"x");
        assert_ne!(one, two);
        assert!(two.as_str().contains("__1200x_optimized__"));
    }

    #[test]
    fn test_long_prefix_truncated() {
        let base = "a/".repeat(100);
        let key = CacheKey::new(&base, &["compiled"], b"");
        let prefix = key.as_str().split("__").next().unwrap();
        assert!(prefix.len() <= PREFIX_MAX);
        assert!(!prefix.ends_with('-'));
    }

    #[test]
    fn test_empty_tags() {
        let key = CacheKey::new("x.css", &[] as &[&str], b"");
        assert_eq!(key.as_str().matches("__").count(), 1);
    }
}
