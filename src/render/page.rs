//! Output file and URL of a page.

use super::RenderError;
use crate::config::SiteConfig;
use crate::utils::path::join_path;

/// What the resolver needs to know about a page.
pub trait PageItem {
    /// Page path without extension, e.g. `blog/post-1`. Empty for the homepage.
    fn path(&self) -> &str;

    /// Language code, `None` for the default language.
    fn language(&self) -> Option<&str>;

    /// Served as `<path>.<ext>` instead of `<path>/index.<ext>`.
    fn is_ugly_url(&self) -> bool;
}

/// Plain [`PageItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRef {
    pub path: String,
    pub language: Option<String>,
    pub ugly_url: bool,
}

impl PageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_ugly_url(mut self, ugly_url: bool) -> Self {
        self.ugly_url = ugly_url;
        self
    }
}

impl PageItem for PageRef {
    fn path(&self) -> &str {
        &self.path
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn is_ugly_url(&self) -> bool {
        self.ugly_url
    }
}

/// Maps pages to output files using `[output.formats]`.
#[derive(Debug, Clone, Copy)]
pub struct OutputPathResolver<'a> {
    config: &'a SiteConfig,
}

impl<'a> OutputPathResolver<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Output file relative to the output directory.
    ///
    /// `<language>/<path>/<subpath>/<filename>.<extension>`, where ugly URLs
    /// drop the filename, the homepage becomes `index`, and the default
    /// language gets no prefix.
    pub fn output_file(&self, page: &dyn PageItem, format: &str) -> Result<String, RenderError> {
        let output = self
            .config
            .output
            .format(format)
            .ok_or_else(|| RenderError::UnknownFormat(format.to_string()))?;

        let filename = if page.is_ugly_url() { "" } else { output.filename.as_str() };
        let extension = if output.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", output.extension)
        };
        let path = match page.path() {
            "" if filename.is_empty() => "index",
            path => path,
        };
        let language = page
            .language()
            .filter(|lang| *lang != self.config.language.default)
            .unwrap_or_default();

        let joined = join_path(&[language, path, output.subpath.as_str(), filename]);
        Ok(format!("{}{extension}", joined.trim_start_matches('/')))
    }

    /// Public URL: the output file without a trailing `index.html`,
    /// unless the page uses ugly URLs.
    pub fn url(&self, page: &dyn PageItem, format: &str) -> Result<String, RenderError> {
        let output = self.output_file(page, format)?;
        if page.is_ugly_url() {
            return Ok(output);
        }
        Ok(match output.strip_suffix("index.html") {
            Some(dir) => dir.to_string(),
            None => output,
        })
    }
}
