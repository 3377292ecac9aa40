//! JS and CSS minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use anyhow::{Context, bail};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::replace_ext;
use crate::asset::{Asset, AssetError};
use crate::debug;
use crate::utils::hash::fingerprint;

const TAG: &str = "minified";

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> anyhow::Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if let Some(err) = ret.errors.first() {
        bail!("{err}");
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> anyhow::Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .context("failed to print stylesheet")?;
    Ok(result.code)
}

impl Asset<'_> {
    /// Minify CSS or JS, compiling SCSS first.
    ///
    /// Skipped for debug builds with source maps, other extensions, and
    /// names already ending in `.min.<ext>` before fingerprinting.
    pub fn minify(&mut self) -> Result<&mut Self, AssetError> {
        if self.data.stages.minified || self.data.missing || self.sourcemap_active() {
            return Ok(self);
        }
        if self.data.ext == "scss" {
            self.compile()?;
        }
        let ext = self.data.ext.clone();
        if ext != "css" && ext != "js" {
            return Ok(self);
        }
        let suffix = format!(".min.{ext}");
        if self.data.filename.ends_with(&suffix) || self.unfingerprinted_path().ends_with(&suffix) {
            self.data.stages.minified = true;
            return Ok(self);
        }

        let session = self.session;
        let key = self.stage_key(&[TAG], &self.data.content);
        let data = session.cache().get_or_insert_with(&key, || {
            let source = String::from_utf8_lossy(&self.data.content);
            let minified = match ext.as_str() {
                "css" => minify_css(&source),
                "js" => minify_js(&source),
                other => return Err(AssetError::UnsupportedMinify(other.to_string())),
            }
            .map_err(|err| AssetError::Minify {
                path: self.data.path.clone(),
                message: format!("{err:#}"),
            })?;

            let mut data = self.data.clone();
            data.path = replace_ext(&data.path, &ext, &suffix);
            data.content = minified.into_bytes();
            data.stages.minified = true;
            Self::push_tag(&mut data, TAG);
            debug!("asset"; "minified {}", data.path);
            Ok(data)
        })?;

        self.data = data;
        Ok(self)
    }

    /// Current path without the fingerprint segment.
    fn unfingerprinted_path(&self) -> String {
        if !self.data.stages.fingerprinted {
            return self.data.path.clone();
        }
        let segment = format!(".{}", fingerprint(&self.data.content_source));
        self.data.path.replacen(&segment, "", 1)
    }
}
