//! Transformation stages.
//!
//! | Stage         | Applies to  | Cache tag        | Path change               |
//! |---------------|-------------|------------------|---------------------------|
//! | `fingerprint` | any         | none (pure)      | `a.css` → `a.<hash>.css`  |
//! | `compile`     | `scss`      | `compiled`       | `a.scss` → `a.css`        |
//! | `minify`      | `css`, `js` | `minified`       | `a.css` → `a.min.css`     |
//! | `optimize`    | images      | `<w>x optimized` | none, runs after save     |
//! | `resize`      | images      | `<w>x`           | `/<target>/thumbnails/<w>/...` |
//!
//! Stages are guarded by [`StageFlags`](super::StageFlags) and do nothing
//! on missing placeholders.

mod compile;
mod fingerprint;
mod image;
mod integrity;
mod minify;

pub use compile::{GrassCompiler, ScssCompiler, ScssRequest};
pub use image::{ImageOptimizer, ReencodeOptimizer, dimensions};
pub use integrity::IntegrityAlgo;
pub use minify::{minify_css, minify_js};

/// Replace the trailing `.<ext>` of `path` with `replacement`.
///
/// Paths without that suffix are returned unchanged.
fn replace_ext(path: &str, ext: &str, replacement: &str) -> String {
    if ext.is_empty() {
        return path.to_string();
    }
    match path.strip_suffix(ext).and_then(|stem| stem.strip_suffix('.')) {
        Some(stem) => format!("{stem}{replacement}"),
        None => path.to_string(),
    }
}
