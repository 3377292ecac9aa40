//! MIME type detection utilities.
//!
//! Assets are classified by extension: the top-level type (`image`, `text`, ...)
//! decides which stages apply, and bundles require it to match across members.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const SCSS: &str = "text/x-scss; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";

    // Documents
    pub const PDF: &str = "application/pdf";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const WASM: &str = "application/wasm";
    pub const ZIP: &str = "application/zip";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
    pub const TIFF: &str = "image/tiff";

    // Audio
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const FLAC: &str = "audio/flac";

    // Video
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Fonts
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
}

/// Guess MIME type from file extension.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess MIME type from file extension string (case-insensitive).
pub fn from_extension(ext: Option<&str>) -> &'static str {
    let Some(ext) = ext else {
        return types::OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        // Web / Text
        "html" | "htm" => types::HTML,
        "css" => types::CSS,
        "scss" | "sass" => types::SCSS,
        "js" | "mjs" | "cjs" => types::JAVASCRIPT,
        "json" => types::JSON,
        "xml" => types::XML,
        "txt" => types::PLAIN,
        "md" => types::MARKDOWN,

        // Web feeds
        "rss" => types::RSS,
        "atom" => types::ATOM,

        // Images
        "svg" => types::SVG,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "ico" => types::ICO,
        "bmp" => types::BMP,
        "tif" | "tiff" => types::TIFF,

        // Audio
        "mp3" => types::MP3,
        "wav" => types::WAV,
        "ogg" | "oga" => types::OGG_AUDIO,
        "flac" => types::FLAC,

        // Video
        "mp4" | "m4v" => types::MP4,
        "webm" => types::WEBM,

        // Fonts
        "woff" => types::WOFF,
        "woff2" => types::WOFF2,
        "ttf" => types::TTF,
        "otf" => types::OTF,

        // Documents / Binary
        "pdf" => types::PDF,
        "wasm" => types::WASM,
        "zip" => types::ZIP,

        _ => types::OCTET_STREAM,
    }
}

/// Strip parameters from a MIME type (`text/css; charset=utf-8` → `text/css`).
#[inline]
pub fn essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}

/// Split a MIME type into its top-level type and full essence.
///
/// `image/png` → `("image", "image/png")`
pub fn split(mime: &str) -> (&str, &str) {
    let essence = essence(mime);
    let kind = essence.split('/').next().unwrap_or(essence);
    (kind, essence)
}

/// Check if the MIME type represents an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}
