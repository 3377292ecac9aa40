//! Site configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── language   # [language]
//! │   ├── assets     # [assets] and sub-sections
//! │   └── output     # [output.formats.*]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    AssetsConfig, BuildConfig, CompileConfig, ImagesConfig, LanguageConfig, OutputConfig,
    OutputFormat, OutputStyle,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "kiln.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `kiln.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub language: LanguageConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl SiteConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// Without a config file the defaults apply, rooted at cwd.
    pub fn load(config_name: &Path) -> Result<Self, ConfigError> {
        let (mut config, config_path) = match find_config_file(config_name) {
            Some(path) => (Self::from_path(&path)?, path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|err| ConfigError::Io(PathBuf::from("."), err))?;
                debug!("config"; "{} not found, using defaults", config_name.display());
                (Self::default(), cwd.join(config_name))
            }
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self {
            config_path: root.join(CONFIG_FILE),
            ..Self::default()
        };
        config.finalize(root);
        config
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path, rejecting unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            return Err(ConfigError::UnknownFields {
                path: path.to_path_buf(),
                fields: ignored,
            });
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Resolve the root and make every directory absolute.
    fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.build.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // directories
    // ========================================================================

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    pub fn assets_dir(&self) -> &Path {
        &self.build.assets
    }

    pub fn static_dir(&self) -> &Path {
        &self.build.static_dir
    }

    /// `<themes>/<theme>/<sub>` for every configured theme, in order.
    pub fn theme_dirs<'a>(&'a self, sub: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.build
            .theme
            .iter()
            .map(move |theme| self.build.themes.join(theme).join(sub))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.build.cache
    }

    /// Downloaded remote assets.
    pub fn remote_cache_dir(&self) -> PathBuf {
        self.build.cache.join("assets").join("remote")
    }

    /// Content store records.
    pub fn store_dir(&self) -> PathBuf {
        self.build.cache.join("store")
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, collecting every error before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate_field_status(&mut diag);
        self.assets.validate_field_status(&mut diag);

        self.build.validate(&mut diag);
        self.language.validate(&mut diag);
        self.assets.validate(&mut diag);
        self.output.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Parse config and root it at `root`.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> SiteConfig {
    let mut config = test_parse_config(content);
    config.config_path = root.join(CONFIG_FILE);
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[build\noutput = \"x\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[assets]\ntarget = \"a\"\ntypo = 1\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.assets.target, "a");
        assert!(ignored.iter().any(|f| f == "assets.typo"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_from_path_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[assets.images]\nqualty = 80\n").unwrap();

        let err = SiteConfig::from_path(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownFields { ref fields, .. } if fields == &["assets.images.qualty"]
        ));
    }

    #[test]
    fn test_for_root_directories() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::for_root(dir.path());
        let root = config.get_root().to_path_buf();

        assert_eq!(config.output_dir(), root.join("public"));
        assert_eq!(config.static_dir(), root.join("static"));
        assert_eq!(config.remote_cache_dir(), root.join(".kiln/cache/assets/remote"));
        assert_eq!(config.store_dir(), root.join(".kiln/cache/store"));
    }

    #[test]
    fn test_theme_dirs_in_order() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "[build]\ntheme = [\"a\", \"b\"]");
        let themes = config.build.themes.clone();

        let dirs: Vec<_> = config.theme_dirs("assets").collect();
        assert_eq!(dirs, vec![themes.join("a/assets"), themes.join("b/assets")]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = test_parse_config(
            "[assets.compile]\nstyle = \"nested\"\n[assets.images]\nquality = 101\n",
        );
        match config.validate() {
            Err(ConfigError::Diagnostics(diag)) => assert_eq!(diag.len(), 2),
            other => panic!("expected diagnostics, got {other:?}"),
        }
    }
}
