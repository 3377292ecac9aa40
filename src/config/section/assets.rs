//! `[assets]` section configuration.
//!
//! Toggles and parameters for the asset pipeline stages.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! target = "assets"              # Public prefix for remote files and thumbnails
//!
//! [assets.fingerprint]
//! enable = true
//!
//! [assets.minify]
//! enable = true
//!
//! [assets.compile]
//! enable = true
//! import = ["sass", "scss"]      # Import subdirectories
//! sourcemap = false              # Only honored in debug builds
//! style = "expanded"             # expanded | compressed
//! variables = { primary = "#333" }
//!
//! [assets.images]
//! quality = 75
//!
//! [assets.images.optimize]
//! enable = false
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Default quality for the image optimizer and the resize encoder.
pub const DEFAULT_QUALITY: u8 = 75;

// ============================================================================
// [assets]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets")]
pub struct AssetsConfig {
    /// Public directory for remote files and thumbnails.
    pub target: String,

    /// Content hash in file names.
    #[config(sub_config)]
    pub fingerprint: FingerprintConfig,

    /// CSS/JS minification.
    #[config(sub_config)]
    pub minify: MinifyConfig,

    /// SCSS compilation.
    #[config(sub_config)]
    pub compile: CompileConfig,

    /// Image quality and optimization.
    #[config(sub_config)]
    pub images: ImagesConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            target: "assets".into(),
            fingerprint: FingerprintConfig::default(),
            minify: MinifyConfig::default(),
            compile: CompileConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl AssetsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.target.contains(['\\', ':']) || self.target.split('/').any(|s| s == "..") {
            diag.error(
                Self::FIELDS.target,
                format!("'{}' is not a valid public path", self.target),
            );
        }
        self.compile.validate(diag);
        self.images.validate(diag);
    }
}

// ============================================================================
// [assets.fingerprint] / [assets.minify]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets.fingerprint")]
pub struct FingerprintConfig {
    /// Insert a content digest before the extension.
    pub enable: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets.minify")]
pub struct MinifyConfig {
    /// Minify CSS and JS assets.
    pub enable: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

// ============================================================================
// [assets.compile]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets.compile")]
pub struct CompileConfig {
    /// Compile SCSS assets to CSS.
    pub enable: bool,

    /// Import subdirectories, looked up under static, assets and theme dirs.
    pub import: Vec<String>,

    /// Inline source maps (debug builds only, disables minification).
    pub sourcemap: bool,

    /// Output style: `expanded` or `compressed`.
    pub style: String,

    /// Variables injected before the stylesheet.
    pub variables: BTreeMap<String, String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            enable: true,
            import: vec!["sass".into(), "scss".into()],
            sourcemap: false,
            style: OutputStyle::Expanded.to_string(),
            variables: BTreeMap::new(),
        }
    }
}

impl CompileConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.style.parse::<OutputStyle>().is_err() {
            diag.error_with_hint(
                Self::FIELDS.style,
                format!("unsupported output style '{}'", self.style),
                "use `expanded` or `compressed`",
            );
        }
        for (i, dir) in self.import.iter().enumerate() {
            if dir.split(['/', '\\']).any(|s| s == "..") {
                diag.error(
                    Self::FIELDS.import,
                    format!("[{i}] parent directory '..' not allowed in '{dir}'"),
                );
            }
        }
    }
}

/// SCSS output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Expanded,
    Compressed,
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expanded" => Ok(Self::Expanded),
            "compressed" => Ok(Self::Compressed),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Expanded => "expanded",
            Self::Compressed => "compressed",
        })
    }
}

// ============================================================================
// [assets.images]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets.images")]
pub struct ImagesConfig {
    /// Encoder quality (0-100) for optimization and resizing.
    pub quality: u8,

    /// Lossless/lossy re-encoding of written images.
    #[config(sub_config)]
    pub optimize: OptimizeConfig,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            optimize: OptimizeConfig::default(),
        }
    }
}

impl ImagesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.quality > 100 {
            diag.error_with_hint(
                Self::FIELDS.quality,
                format!("quality {} is out of range", self.quality),
                "use a value between 0 and 100",
            );
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "assets.images.optimize")]
pub struct OptimizeConfig {
    /// Optimize images after they are written.
    pub enable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        let assets = &config.assets;
        assert_eq!(assets.target, "assets");
        assert!(assets.fingerprint.enable);
        assert!(assets.minify.enable);
        assert!(assets.compile.enable);
        assert_eq!(assets.compile.import, vec!["sass", "scss"]);
        assert_eq!(assets.compile.style, "expanded");
        assert_eq!(assets.images.quality, 75);
        assert!(!assets.images.optimize.enable);
    }

    #[test]
    fn test_parse_compile_section() {
        let config = test_parse_config(
            r##"
[assets.compile]
style = "compressed"
sourcemap = true
variables = { primary = "#333", gutter = "8px" }
"##,
        );
        let compile = &config.assets.compile;
        assert_eq!(compile.style.parse::<OutputStyle>(), Ok(OutputStyle::Compressed));
        assert!(compile.sourcemap);
        assert_eq!(compile.variables.get("primary").map(String::as_str), Some("#333"));
    }

    #[test]
    fn test_invalid_style_reported() {
        let config = test_parse_config("[assets.compile]\nstyle = \"nested\"");
        let mut diag = ConfigDiagnostics::new();
        config.assets.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "assets.compile.style");
    }

    #[test]
    fn test_quality_out_of_range() {
        let config = test_parse_config("[assets.images]\nquality = 120");
        let mut diag = ConfigDiagnostics::new();
        config.assets.validate(&mut diag);
        assert_eq!(diag.errors()[0].field.as_str(), "assets.images.quality");
    }

    #[test]
    fn test_quality_overflow_is_parse_error() {
        let result = crate::config::SiteConfig::from_str("[assets.images]\nquality = 300");
        assert!(result.is_err());
    }
}
