//! Assets: resolution, bundling and transformation.
//!
//! An [`Asset`] wraps one or more homogeneous source files. Construction
//! resolves and concatenates them, then applies the configured stages in
//! a fixed order:
//!
//! ```text
//! resolve → bundle → fingerprint → compile → minify → save (→ optimize)
//! ```
//!
//! Every stage is idempotent and memoized through the session's content
//! store. [`Asset::resize`] derives a new asset instead of mutating.
//!
//! | Module    | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `resolve` | Reference lookup, remote download, classification|
//! | `build`   | Bundle assembly (`Asset::new`)                   |
//! | `stage`   | Fingerprint, compile, minify, images, integrity  |
//! | `persist` | Writing to the output tree                       |

mod build;
mod data;
mod error;
mod options;
mod persist;
pub mod resolve;
pub mod stage;

pub use data::{AssetData, MediaType, StageFlags};
pub use error::AssetError;
pub use options::AssetOptions;
pub use stage::IntegrityAlgo;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::cache::CacheKey;
use crate::core::BuildSession;

/// A buildable asset bound to a build session.
#[derive(Clone)]
pub struct Asset<'s> {
    session: &'s BuildSession,
    data: AssetData,
    options: AssetOptions,
    /// Bundle identity: source references joined with `_`.
    base_key: String,
}

impl<'s> Asset<'s> {
    // ========================================================================
    // accessors
    // ========================================================================

    /// Public path after the stages applied so far. Empty for placeholders.
    pub fn path(&self) -> &str {
        &self.data.path
    }

    pub fn path_source(&self) -> &str {
        &self.data.path_source
    }

    pub fn filename(&self) -> &str {
        &self.data.filename
    }

    /// Absolute source files, in bundle order.
    pub fn files(&self) -> &[PathBuf] {
        &self.data.files
    }

    /// First source file.
    pub fn file(&self) -> Option<&Path> {
        self.data.files.first().map(PathBuf::as_path)
    }

    pub fn ext(&self) -> &str {
        &self.data.ext
    }

    pub fn media(&self) -> &MediaType {
        &self.data.media
    }

    pub fn size(&self) -> u64 {
        self.data.size
    }

    pub fn content(&self) -> &[u8] {
        &self.data.content
    }

    pub fn content_source(&self) -> &[u8] {
        &self.data.content_source
    }

    pub fn stages(&self) -> StageFlags {
        self.data.stages
    }

    pub fn tags(&self) -> &[String] {
        &self.data.tags
    }

    pub fn options(&self) -> &AssetOptions {
        &self.options
    }

    pub fn data(&self) -> &AssetData {
        &self.data
    }

    /// Bundle identity shared by every asset derived from the same sources.
    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    /// At least one source could not be resolved (`ignore_missing`).
    pub fn is_missing(&self) -> bool {
        self.data.missing
    }

    pub fn is_image(&self) -> bool {
        self.data.media.is_image()
    }

    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.extra.get(key)
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.extra.insert(key.into(), value);
    }

    // ========================================================================
    // stage helpers
    // ========================================================================

    /// Cache key for a stage reading `input` at the current path.
    fn stage_key<T: AsRef<str>>(&self, tags: &[T], input: &[u8]) -> CacheKey {
        self.stage_key_parts(tags, &[input])
    }

    /// Like [`Self::stage_key`], for stages whose output also depends on
    /// settings.
    fn stage_key_parts<T: AsRef<str>>(&self, tags: &[T], parts: &[&[u8]]) -> CacheKey {
        let mut keyed = Vec::from(self.data.path.as_bytes());
        for part in parts {
            keyed.push(0);
            keyed.extend_from_slice(part);
        }
        CacheKey::new(&self.base_key, tags, &keyed)
    }

    /// Record `tag` as applied.
    fn push_tag(data: &mut AssetData, tag: &str) {
        if !data.tags.iter().any(|t| t == tag) {
            data.tags.push(tag.to_string());
        }
    }
}

impl fmt::Display for Asset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data.path)
    }
}

impl fmt::Debug for Asset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("base_key", &self.base_key)
            .field("path", &self.data.path)
            .field("ext", &self.data.ext)
            .field("stages", &self.data.stages)
            .field("tags", &self.data.tags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::asset::resolve::tests::FakeFetcher;
    use crate::asset::stage::tests::{FakeCompiler, NoopOptimizer};
    use crate::cache::MemoryStore;
    use crate::config::test_config_at;
    use crate::core::{BuildOptions, BuildSession};

    /// Temp site with an in-memory store and fake collaborators.
    pub struct Site {
        pub dir: TempDir,
        pub store: Arc<MemoryStore>,
        pub session: BuildSession,
    }

    impl Site {
        pub fn new(config: &str) -> Self {
            Self::with_options(config, BuildOptions::default())
        }

        pub fn with_options(config: &str, options: BuildOptions) -> Self {
            let dir = TempDir::new().unwrap();
            let store = Arc::new(MemoryStore::new());
            let session = BuildSession::builder(Arc::new(test_config_at(dir.path(), config)))
                .options(options)
                .store(store.clone())
                .fetcher(FakeFetcher::default())
                .compiler(FakeCompiler)
                .optimizer(NoopOptimizer)
                .build();
            Self {
                dir,
                store,
                session,
            }
        }

        pub fn root(&self) -> &Path {
            self.session.config().get_root()
        }

        pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        pub fn output(&self, public: &str) -> std::path::PathBuf {
            crate::utils::path::join_file(self.session.config().output_dir(), public)
        }
    }

    /// Encode a solid-color PNG.
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encoded(width, height, image::ImageFormat::Png)
    }

    /// Encode a solid-color image in `format`.
    pub fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }
}
