//! Content hashing using blake3.
//!
//! Fingerprints end up in public file names and cache keys, so they must be
//! stable across runs and platforms.
//!
//! # Usage
//!
//! ```ignore
//! use kiln::utils::hash;
//!
//! let fp = hash::fingerprint(b"body { color: red }"); // 32 hex chars
//! let key = hash::digest(&[b"a.css", b"minified"]);
//! ```

/// Number of hex characters kept from a blake3 hash.
pub const FINGERPRINT_LEN: usize = 32;

/// Hash byte data and return a 32-char hex fingerprint.
///
/// Used for cache-busting filenames (e.g. `style.<fingerprint>.css`).
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let hash = blake3::hash(data.as_ref());
    hash.to_hex()[..FINGERPRINT_LEN].to_string()
}

/// Hash several parts into one fingerprint.
///
/// Each part is length-prefixed, so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn digest<T: AsRef<[u8]>>(parts: &[T]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        let bytes = part.as_ref();
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hex::encode(&hasher.finalize().as_bytes()[..FINGERPRINT_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint("body { color: red; }");
        let b = fingerprint("body { color: red; }");
        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert_ne!(a, fingerprint("body { color: blue; }"));
    }

    #[test]
    fn test_digest_is_length_prefixed() {
        assert_ne!(digest(&["ab", "c"]), digest(&["a", "bc"]));
        assert_eq!(digest(&["ab", "c"]), digest(&["ab", "c"]));
        assert_eq!(digest(&["x"]).len(), FINGERPRINT_LEN);
    }
}
