//! Per-asset options.
//!
//! Defaults come from `[assets]` in `kiln.toml`; callers override single
//! fields with the `with_*` methods, or pass an untyped map from the
//! template layer to [`AssetOptions::from_map`].

use serde_json::{Map, Value};

use super::AssetError;
use crate::config::SiteConfig;

/// Options recognized by `Asset::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOptions {
    /// Insert a content digest into the file name.
    pub fingerprint: bool,
    /// Minify CSS and JS.
    pub minify: bool,
    /// Optimize images after they are written.
    pub optimize: bool,
    /// Explicit output name, overrides the derived bundle name.
    pub filename: String,
    /// Turn unresolved sources and save failures into a placeholder.
    pub ignore_missing: bool,
    /// Prefix local public paths with `/`.
    pub force_slash: bool,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            fingerprint: true,
            minify: true,
            optimize: false,
            filename: String::new(),
            ignore_missing: false,
            force_slash: true,
        }
    }
}

impl AssetOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            fingerprint: config.assets.fingerprint.enable,
            minify: config.assets.minify.enable,
            optimize: config.assets.images.optimize.enable,
            ..Self::default()
        }
    }

    /// Config defaults overridden by `map`. Unknown keys are rejected.
    ///
    /// ```ignore
    /// // {{ asset("css/main.scss", { minify: false, filename: "app.css" }) }}
    /// let options = AssetOptions::from_map(&config, &map)?;
    /// ```
    pub fn from_map(config: &SiteConfig, map: &Map<String, Value>) -> Result<Self, AssetError> {
        let mut options = Self::from_config(config);
        for (key, value) in map {
            match key.as_str() {
                "fingerprint" => options.fingerprint = expect_bool(key, value)?,
                "minify" => options.minify = expect_bool(key, value)?,
                "optimize" => options.optimize = expect_bool(key, value)?,
                "ignore_missing" => options.ignore_missing = expect_bool(key, value)?,
                "force_slash" => options.force_slash = expect_bool(key, value)?,
                "filename" => {
                    options.filename = value
                        .as_str()
                        .ok_or_else(|| invalid(key, "a string"))?
                        .to_string();
                }
                _ => return Err(AssetError::UnknownOption(key.clone())),
            }
        }
        Ok(options)
    }

    pub fn with_fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_ignore_missing(mut self, ignore_missing: bool) -> Self {
        self.ignore_missing = ignore_missing;
        self
    }

    pub fn with_force_slash(mut self, force_slash: bool) -> Self {
        self.force_slash = force_slash;
        self
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, AssetError> {
    value.as_bool().ok_or_else(|| invalid(key, "a boolean"))
}

fn invalid(key: &str, expected: &'static str) -> AssetError {
    AssetError::InvalidOption {
        key: key.to_string(),
        expected,
    }
}
