//! The asset record: what a stage reads, writes and caches.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::mime;

/// Logical type of an asset.
///
/// `kind` is the top-level MIME type (`image`, `text`), `subtype` the full
/// essence (`image/png`, `text/css`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    pub kind: String,
    pub subtype: String,
}

impl MediaType {
    pub fn from_extension(ext: &str) -> Self {
        let (kind, subtype) = mime::split(mime::from_extension(Some(ext)));
        Self {
            kind: kind.to_string(),
            subtype: subtype.to_string(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == "image"
    }

    pub fn is_svg(&self) -> bool {
        matches!(self.subtype.as_str(), "image/svg" | "image/svg+xml")
    }
}

/// Which stages have already run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFlags {
    pub fingerprinted: bool,
    pub compiled: bool,
    pub minified: bool,
    pub optimized: bool,
}

/// Serializable asset state.
///
/// `path_source` and `content_source` are frozen once the bundle is
/// assembled; `path` and `content` track the current stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetData {
    /// Absolute source files, in bundle order.
    pub files: Vec<PathBuf>,
    /// Public path of the first member.
    pub filename: String,
    /// Public path before any stage.
    pub path_source: String,
    /// Public path after the stages applied so far.
    pub path: String,
    pub ext: String,
    pub media: MediaType,
    /// Summed size of all members, in bytes.
    pub size: u64,
    #[serde(with = "base64_bytes")]
    pub content_source: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// At least one member could not be resolved.
    pub missing: bool,
    pub stages: StageFlags,
    /// Cache tags applied so far, e.g. `["1200x", "optimized"]`.
    pub tags: Vec<String>,
    /// Arbitrary properties set by templates.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AssetData {
    /// Placeholder for a bundle with unresolved members.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
