//! `[output]` section configuration.
//!
//! Named output formats describe where a rendered page lands:
//! `<language>/<path>/<subpath>/<filename>.<extension>`.
//!
//! # Example
//!
//! ```toml
//! [output.formats.amp]
//! subpath = "amp"
//! filename = "index"
//! extension = "html"
//! ```
//!
//! User formats are merged over the built-in ones.

use std::collections::BTreeMap;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// A page output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFormat {
    /// Directory appended after the page path (e.g. `amp`).
    pub subpath: String,
    /// File name without extension. Ignored for ugly URLs.
    pub filename: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new("", "index", "html")
    }
}

impl OutputFormat {
    pub fn new(subpath: &str, filename: &str, extension: &str) -> Self {
        Self {
            subpath: subpath.into(),
            filename: filename.into(),
            extension: extension.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "output")]
pub struct OutputConfig {
    /// Output formats by name.
    #[serde(deserialize_with = "merge_with_builtin")]
    pub formats: BTreeMap<String, OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: builtin_formats(),
        }
    }
}

impl OutputConfig {
    pub fn format(&self, name: &str) -> Option<&OutputFormat> {
        self.formats.get(name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (name, format) in &self.formats {
            if format.extension.starts_with('.') {
                diag.error_with_hint(
                    Self::FIELDS.formats,
                    format!("format '{name}': extension '{}' starts with '.'", format.extension),
                    format!("write `extension = \"{}\"`", format.extension.trim_start_matches('.')),
                );
            }
            if format.subpath.contains("..") || format.filename.contains('/') {
                diag.error(
                    Self::FIELDS.formats,
                    format!("format '{name}': subpath/filename must stay inside the page directory"),
                );
            }
        }
    }
}

fn builtin_formats() -> BTreeMap<String, OutputFormat> {
    [
        ("html", OutputFormat::new("", "index", "html")),
        ("amp", OutputFormat::new("amp", "index", "html")),
        ("json", OutputFormat::new("", "index", "json")),
        ("xml", OutputFormat::new("", "index", "xml")),
        ("txt", OutputFormat::new("", "index", "txt")),
        ("atom", OutputFormat::new("", "atom", "xml")),
        ("rss", OutputFormat::new("", "rss", "xml")),
    ]
    .into_iter()
    .map(|(name, format)| (name.to_string(), format))
    .collect()
}

fn merge_with_builtin<'de, D>(deserializer: D) -> Result<BTreeMap<String, OutputFormat>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let user = BTreeMap::<String, OutputFormat>::deserialize(deserializer)?;
    let mut formats = builtin_formats();
    formats.extend(user);
    Ok(formats)
}
