//! `[language]` section configuration.
//!
//! ```toml
//! [language]
//! default = "en"
//! ```

use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "language")]
pub struct LanguageConfig {
    /// Default language code. Pages in this language get no path prefix.
    pub default: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: "en".into(),
        }
    }
}

impl LanguageConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.default.trim().is_empty() {
            diag.error(Self::FIELDS.default, "default language must not be empty");
        }
    }
}
