//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public"           # Output root for pages and assets
//! assets = "assets"           # Project assets directory
//! static = "static"           # Project static directory
//! themes = "themes"           # Themes root (themes/<name>/{assets,static})
//! cache = ".kiln/cache"       # Content store and remote downloads
//! theme = ["hyde", "base"]    # Theme lookup order
//! ```

use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build directories, all relative to the project root until normalized.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildConfig {
    /// Output root for pages and assets.
    pub output: PathBuf,

    /// Project assets directory.
    pub assets: PathBuf,

    /// Project static directory. Files here win over generated assets.
    #[serde(rename = "static")]
    #[config(name = "static")]
    pub static_dir: PathBuf,

    /// Themes root directory.
    pub themes: PathBuf,

    /// Cache root (content store and remote downloads).
    pub cache: PathBuf,

    /// Theme names, searched in order after the project directories.
    pub theme: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "public".into(),
            assets: "assets".into(),
            static_dir: "static".into(),
            themes: "themes".into(),
            cache: ".kiln/cache".into(),
            theme: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Join every directory with `root`.
    pub fn normalize(&mut self, root: &Path) {
        for dir in [
            &mut self.output,
            &mut self.assets,
            &mut self.static_dir,
            &mut self.themes,
            &mut self.cache,
        ] {
            *dir = crate::utils::path::normalize_path(&root.join(&*dir));
        }
    }

    /// Validate theme names before they are joined into paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (i, name) in self.theme.iter().enumerate() {
            if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
                diag.error_with_hint(
                    Self::FIELDS.theme,
                    format!("[{i}] invalid theme name '{name}'"),
                    "use the directory name under `build.themes`",
                );
            }
        }
    }
}
