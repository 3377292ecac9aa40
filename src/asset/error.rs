//! Asset error type.
//!
//! Every variant aborts the current asset only. Callers (the page or
//! template layer) decide whether to skip the page or stop the build.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset path can't be empty")]
    EmptyPath,

    #[error("asset file `{0}` doesn't exist")]
    NotFound(String),

    #[error("remote asset `{0}` is empty")]
    EmptyRemoteContent(String),

    #[error("failed to fetch remote asset `{url}`: {message}")]
    Remote { url: String, message: String },

    #[error("asset bundle type error ({found} != {expected})")]
    BundleType { expected: String, found: String },

    #[error("asset bundle extension error ({found} != {expected})")]
    BundleExtension { expected: String, found: String },

    #[error("asset bundle supports scss, css and js files only, got `{0}`")]
    BundleUnsupported(String),

    #[error("scss output style `{0}` doesn't exist")]
    UnsupportedStyle(String),

    #[error("failed to compile `{path}`: {message}")]
    Compile { path: String, message: String },

    #[error("not able to minify `{0}`")]
    UnsupportedMinify(String),

    #[error("failed to minify `{path}`: {message}")]
    Minify { path: String, message: String },

    #[error("`{0}` is not an image")]
    NotImage(String),

    #[error("not able to resize `{0}`: unsupported image format")]
    ResizeUnsupported(String),

    #[error("not able to decode image `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("not able to encode image `{path}`: {message}")]
    Encode { path: String, message: String },

    #[error("not able to get size of image `{0}`")]
    ImageSize(String),

    #[error("can't save asset `{}`", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("cache error for key `{key}`")]
    Cache {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown asset option `{0}`")]
    UnknownOption(String),

    #[error("invalid value for asset option `{key}`: expected {expected}")]
    InvalidOption { key: String, expected: &'static str },
}
