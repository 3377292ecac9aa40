//! SCSS compilation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use super::replace_ext;
use crate::asset::{Asset, AssetError, MediaType};
use crate::config::{OutputStyle, SiteConfig};
use crate::debug;
use crate::utils::hash::digest;

const TAG: &str = "compiled";

/// Everything a compiler needs for one stylesheet.
#[derive(Debug)]
pub struct ScssRequest<'a> {
    pub source: &'a str,
    /// Import search paths, in lookup order.
    pub load_paths: &'a [PathBuf],
    pub style: OutputStyle,
    /// Injected before the stylesheet, so `!default` declarations yield.
    pub variables: &'a BTreeMap<String, String>,
    /// Ask for an inline source map. A hint: compilers may ignore it.
    pub source_map: bool,
}

/// SCSS to CSS compiler.
pub trait ScssCompiler: Send + Sync {
    /// Compile `request.source` to CSS.
    ///
    /// `request.source_map` is only a hint. Implementations without source
    /// map support return plain CSS, as [`GrassCompiler`] does.
    fn compile(&self, request: &ScssRequest<'_>) -> anyhow::Result<String>;
}

/// Compiler backed by `grass`.
///
/// `grass` does not emit source maps; `source_map` only disables
/// minification upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassCompiler;

impl ScssCompiler for GrassCompiler {
    fn compile(&self, request: &ScssRequest<'_>) -> anyhow::Result<String> {
        let style = match request.style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };
        let options = grass::Options::default()
            .style(style)
            .load_paths(request.load_paths);

        let mut source = String::new();
        for (name, value) in request.variables {
            source.push_str(&format!("${name}: {value};\n"));
        }
        source.push_str(request.source);

        grass::from_string(source, &options).map_err(|err| anyhow::anyhow!("{err}"))
    }
}

impl Asset<'_> {
    /// Compile SCSS to CSS. Other extensions pass through.
    pub fn compile(&mut self) -> Result<&mut Self, AssetError> {
        if self.data.stages.compiled || self.data.missing || self.data.ext != "scss" {
            return Ok(self);
        }

        let session = self.session;
        let config = session.config();
        let compile = &config.assets.compile;
        let load_paths = import_paths(config, self.file());
        let source_map = self.sourcemap_active();
        let settings = compile_settings(&compile.style, &compile.variables, source_map, &load_paths);
        let key = self.stage_key_parts(
            &[TAG],
            &[
                self.data.content.as_slice(),
                settings.as_bytes(),
                imports_digest(&load_paths).as_bytes(),
            ],
        );

        let data = session.cache().get_or_insert_with(&key, || {
            let style = compile
                .style
                .parse::<OutputStyle>()
                .map_err(AssetError::UnsupportedStyle)?;
            let source = String::from_utf8_lossy(&self.data.content);

            let request = ScssRequest {
                source: &source,
                load_paths: &load_paths,
                style,
                variables: &compile.variables,
                source_map,
            };
            let css = session
                .compiler()
                .compile(&request)
                .map_err(|err| AssetError::Compile {
                    path: self.data.path.clone(),
                    message: format!("{err:#}"),
                })?;

            let mut data = self.data.clone();
            data.path = replace_ext(&data.path, "scss", ".css");
            data.ext = "css".into();
            data.media = MediaType::from_extension("css");
            data.content = css.into_bytes();
            data.stages.compiled = true;
            Self::push_tag(&mut data, TAG);
            debug!("asset"; "compiled {}", data.path);
            Ok(data)
        })?;

        self.data = data;
        Ok(self)
    }

    /// Debug build with `assets.compile.sourcemap` on.
    pub(super) fn sourcemap_active(&self) -> bool {
        self.session.is_debug() && self.session.config().assets.compile.sourcemap
    }
}

/// Compiler settings that change the output, one per line.
fn compile_settings(
    style: &str,
    variables: &BTreeMap<String, String>,
    source_map: bool,
    load_paths: &[PathBuf],
) -> String {
    let mut settings = format!("style={style}\nsourcemap={source_map}\n");
    for (name, value) in variables {
        settings.push_str(&format!("${name}={value}\n"));
    }
    for path in load_paths {
        settings.push_str(&format!("load={}\n", path.display()));
    }
    settings
}

/// Digest of every stylesheet reachable from `load_paths`.
///
/// Partials are not tracked individually, so any edit under a load path
/// invalidates compiled output.
fn imports_digest(load_paths: &[PathBuf]) -> String {
    let mut files: Vec<PathBuf> = load_paths
        .iter()
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            WalkDir::new(dir)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path())
                .filter(|path| {
                    matches!(
                        path.extension().and_then(|ext| ext.to_str()),
                        Some("scss" | "sass" | "css")
                    )
                })
        })
        .collect();
    files.sort();
    files.dedup();

    let mut parts = Vec::with_capacity(files.len() * 2);
    for file in &files {
        parts.push(file.to_string_lossy().into_owned().into_bytes());
        parts.push(fs::read(file).unwrap_or_default());
    }
    digest(&parts)
}

/// Import search paths for a stylesheet, de-duplicated in order.
///
/// static, assets, then for each import dir: `static/<dir>`, `assets/<dir>`,
/// `<asset dir>/<dir>` and each theme's `static/<dir>` and `assets/<dir>`;
/// finally the stylesheet's own directory.
fn import_paths(config: &SiteConfig, file: Option<&Path>) -> Vec<PathBuf> {
    let asset_dir = file.and_then(Path::parent);
    let mut paths = vec![
        config.static_dir().to_path_buf(),
        config.assets_dir().to_path_buf(),
    ];

    for dir in &config.assets.compile.import {
        paths.push(config.static_dir().join(dir));
        paths.push(config.assets_dir().join(dir));
        if let Some(asset_dir) = asset_dir {
            paths.push(asset_dir.join(dir));
        }
        for theme in &config.build.theme {
            let theme_dir = config.build.themes.join(theme);
            paths.push(theme_dir.join("static").join(dir));
            paths.push(theme_dir.join("assets").join(dir));
        }
    }
    paths.extend(asset_dir.map(Path::to_path_buf));

    let mut seen = FxHashSet::default();
    paths.retain(|p| seen.insert(p.clone()));
    paths
}
