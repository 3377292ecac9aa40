//! Image stages: dimensions, optimization and resizing.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::slice;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::asset::{Asset, AssetData, AssetError};
use crate::debug;
use crate::utils::mime;
use crate::utils::path::join_path;

const OPTIMIZED: &str = "optimized";

/// Lossy or lossless recompression of a written image file.
pub trait ImageOptimizer: Send + Sync {
    /// Rewrite `file` in place at `quality` (0-100).
    fn optimize(&self, file: &Path, quality: u8) -> anyhow::Result<()>;
}

/// Re-encodes JPEG at the configured quality and PNG at best compression.
///
/// The file is replaced only when the result is smaller. Other formats are
/// left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReencodeOptimizer;

impl ImageOptimizer for ReencodeOptimizer {
    fn optimize(&self, file: &Path, quality: u8) -> anyhow::Result<()> {
        let original = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
        let format = image::guess_format(&original)?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Ok(());
        }

        let img = image::load_from_memory_with_format(&original, format)?;
        let encoded = encode(&img, format, quality)?;
        if encoded.len() < original.len() {
            fs::write(file, encoded).with_context(|| format!("failed to write {}", file.display()))?;
        }
        Ok(())
    }
}

/// Width and height of an image record.
///
/// SVG reads the root element's `width`/`height` from the source, raster
/// formats read the header of the current content. AVIF has no decoder
/// here, so its `ispe` property is read directly. Non-images are `(0, 0)`.
pub fn dimensions(data: &AssetData) -> Result<(u32, u32), AssetError> {
    if !data.media.is_image() {
        return Ok((0, 0));
    }
    let size = if data.media.is_svg() {
        svg_dimensions(&data.content_source)
    } else if data.media.subtype == mime::types::AVIF {
        avif_dimensions(&data.content)
    } else {
        ImageReader::new(Cursor::new(&data.content))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
    };
    size.ok_or_else(|| AssetError::ImageSize(data.path.clone()))
}

/// Size from the first `ispe` (image spatial extents) box.
fn avif_dimensions(content: &[u8]) -> Option<(u32, u32)> {
    if content.get(4..8)? != b"ftyp" {
        return None;
    }
    let at = content.windows(4).position(|w| w == b"ispe")?;
    // box type, then version and flags
    let body = content.get(at + 8..at + 16)?;
    let width = u32::from_be_bytes(body[..4].try_into().ok()?);
    let height = u32::from_be_bytes(body[4..].try_into().ok()?);
    Some((width, height))
}

/// Root `<svg>` size. Missing or non-numeric attributes count as 0.
fn svg_dimensions(source: &[u8]) -> Option<(u32, u32)> {
    let mut reader = Reader::from_reader(source);
    loop {
        match reader.read_event().ok()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"svg" => {
                let (mut width, mut height) = (0, 0);
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.local_name().as_ref() {
                        b"width" => width = leading_number(&value).unwrap_or(0),
                        b"height" => height = leading_number(&value).unwrap_or(0),
                        _ => {}
                    }
                }
                return Some((width, height));
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// `"120.5px"` → 120.
fn leading_number(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(value.len());
    let number: f64 = value[..end].parse().ok()?;
    Some(number as u32)
}

/// Format of `content` if [`encode`] can write it back.
fn encodable_format(content: &[u8]) -> Option<ImageFormat> {
    image::guess_format(content).ok().filter(|format| {
        matches!(
            format,
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif | ImageFormat::Bmp
        )
    })
}

/// `" (12 Ko -> 8 Ko)"` when the file shrank, rounded up to the next Ko.
fn shrink_note(before: usize, after: usize) -> String {
    if after < before {
        format!(" ({} Ko -> {} Ko)", before.div_ceil(1000), after.div_ceil(1000))
    } else {
        String::new()
    }
}

fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
        }
        ImageFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder)?;
        }
        ImageFormat::WebP => {
            img.write_with_encoder(WebPEncoder::new_lossless(&mut out))?;
        }
        ImageFormat::Gif | ImageFormat::Bmp => {
            img.write_to(&mut Cursor::new(&mut out), format)?;
        }
        other => anyhow::bail!("cannot encode {other:?}"),
    }
    Ok(out)
}

impl<'s> Asset<'s> {
    /// Width in pixels, probed when the asset was assembled.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// Height in pixels, probed when the asset was assembled.
    pub fn height(&self) -> u32 {
        self.data.height
    }

    /// Optimize the written file `file` and reload its bytes.
    ///
    /// Failures are logged and leave the asset as it was.
    pub fn optimize(&mut self, file: &Path) -> &mut Self {
        if self.data.stages.optimized || self.data.missing || !self.is_image() {
            return self;
        }

        let session = self.session;
        let mut tags = Vec::with_capacity(2);
        if self.data.width > 0 {
            tags.push(format!("{}x", self.data.width));
        }
        tags.push(OPTIMIZED.to_string());
        let quality = session.config().assets.images.quality;
        let key = self.stage_key_parts(
            &tags[..],
            &[self.data.content.as_slice(), slice::from_ref(&quality)],
        );

        if let Some(cached) = session.cache().load(&key) {
            match fs::write(file, &cached.content) {
                Ok(()) => self.data = cached,
                Err(err) => debug!("asset"; "failed to write optimized {}: {err}", file.display()),
            }
            return self;
        }

        let before = self.data.content.len();
        if let Err(err) = session.optimizer().optimize(file, quality) {
            debug!("asset"; "failed to optimize {}: {err:#}", self.data.path);
            return self;
        }
        let content = match fs::read(file) {
            Ok(content) => content,
            Err(err) => {
                debug!("asset"; "failed to reload {}: {err}", file.display());
                return self;
            }
        };

        let after = content.len();
        self.data.content = content;
        self.data.size = after as u64;
        self.data.stages.optimized = true;
        for tag in &tags {
            Self::push_tag(&mut self.data, tag);
        }
        if let Err(err) = session.cache().save(&key, &self.data) {
            debug!("asset"; "{err}");
        }
        debug!("asset"; "optimized {}{}", self.data.path, shrink_note(before, after));
        self
    }

    /// Derive a thumbnail `width` pixels wide.
    ///
    /// Never enlarges: a width at or above the current one returns an
    /// unchanged copy. The result lives under `/<target>/thumbnails/<width>/`.
    pub fn resize(&self, width: u32) -> Result<Asset<'s>, AssetError> {
        if !self.is_image() {
            return Err(AssetError::NotImage(self.data.path.clone()));
        }
        if self.data.missing || width >= self.data.width {
            return Ok(self.clone());
        }

        let session = self.session;
        let tag = format!("{width}x");
        let quality = session.config().assets.images.quality;
        let key = self.stage_key_parts(
            &[tag.as_str()],
            &[self.data.content_source.as_slice(), slice::from_ref(&quality)],
        );

        let data = session.cache().get_or_insert_with(&key, || {
            let path = &self.data.path;
            let format = encodable_format(&self.data.content_source)
                .ok_or_else(|| AssetError::ResizeUnsupported(path.clone()))?;

            let img = image::load_from_memory_with_format(&self.data.content_source, format)
                .map_err(|err| AssetError::Decode {
                    path: path.clone(),
                    message: err.to_string(),
                })?;
            let resized = img.resize(width, u32::MAX, FilterType::Lanczos3);
            let content = encode(&resized, format, quality).map_err(|err| AssetError::Encode {
                path: path.clone(),
                message: format!("{err:#}"),
            })?;

            let target = &session.config().assets.target;
            let mut data = self.data.clone();
            data.path = format!(
                "/{}",
                join_path(&[target.as_str(), "thumbnails", width.to_string().as_str(), path.as_str()])
            );
            data.size = content.len() as u64;
            data.content = content;
            Self::push_tag(&mut data, &tag);
            (data.width, data.height) = dimensions(&data)?;
            debug!("asset"; "resized {} to {}", self.data.path, data.path);
            Ok(data)
        })?;

        Ok(Asset {
            session,
            data,
            options: self.options.clone(),
            base_key: self.base_key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::test_support::{Site, encoded, png};
    use crate::asset::{AssetOptions, MediaType};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn options() -> AssetOptions {
        AssetOptions::default()
            .with_fingerprint(false)
            .with_minify(false)
    }

    fn svg_data(source: &str) -> AssetData {
        AssetData {
            path: "/logo.svg".into(),
            ext: "svg".into(),
            media: MediaType::from_extension("svg"),
            content_source: source.as_bytes().to_vec(),
            content: source.as_bytes().to_vec(),
            ..AssetData::default()
        }
    }

    #[test]
    fn test_svg_dimensions() {
        let data = svg_data(r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="120.5px" height="40"></svg>"#);
        assert_eq!(dimensions(&data).unwrap(), (120, 40));

        let data = svg_data(r#"<svg viewBox="0 0 10 10"/>"#);
        assert_eq!(dimensions(&data).unwrap(), (0, 0));
    }

    #[test]
    fn test_svg_non_numeric_size() {
        let data = svg_data(r#"<svg width="auto" height="10"/>"#);
        assert_eq!(dimensions(&data).unwrap(), (0, 10));

        let data = svg_data(r#"<svg width="" height="auto"/>"#);
        assert_eq!(dimensions(&data).unwrap(), (0, 0));
    }

    #[test]
    fn test_svg_without_root() {
        let data = svg_data("<html></html>");
        assert!(matches!(dimensions(&data), Err(AssetError::ImageSize(_))));
    }

    #[test]
    fn test_gif_ico_bmp_assets() {
        let site = Site::new("");
        site.write("assets/img/a.gif", encoded(6, 2, ImageFormat::Gif));
        site.write("assets/favicon.ico", encoded(16, 16, ImageFormat::Ico));
        site.write("assets/img/b.bmp", encoded(3, 5, ImageFormat::Bmp));

        let gif = Asset::new(&site.session, &["img/a.gif"], options()).unwrap();
        assert_eq!(gif.media().subtype, "image/gif");
        assert_eq!((gif.width(), gif.height()), (6, 2));

        let ico = Asset::new(&site.session, &["favicon.ico"], options()).unwrap();
        assert!(ico.is_image());
        assert_eq!((ico.width(), ico.height()), (16, 16));

        let bmp = Asset::new(&site.session, &["img/b.bmp"], options()).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (3, 5));
    }

    fn avif(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 16];
        bytes.extend_from_slice(b"ftypavif");
        bytes.extend_from_slice(&[0; 4]);
        bytes.extend_from_slice(&[0, 0, 0, 20]);
        bytes.extend_from_slice(b"ispe");
        bytes.extend_from_slice(&[0; 4]);
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes
    }

    #[test]
    fn test_avif_dimensions() {
        let site = Site::new("");
        site.write("assets/photo.avif", avif(640, 480));
        let asset = Asset::new(&site.session, &["photo.avif"], options()).unwrap();
        assert_eq!((asset.width(), asset.height()), (640, 480));
        assert!(matches!(asset.resize(100), Err(AssetError::ResizeUnsupported(_))));

        assert_eq!(avif_dimensions(b"not an avif file"), None);
    }

    #[test]
    fn test_raster_dimensions() {
        let data = AssetData {
            media: MediaType::from_extension("png"),
            content: png(7, 3),
            ..AssetData::default()
        };
        assert_eq!(dimensions(&data).unwrap(), (7, 3));
    }

    #[test]
    fn test_unreadable_raster() {
        let site = Site::new("");
        site.write("assets/bad.png", "not a png");
        let err = Asset::new(&site.session, &["bad.png"], options()).unwrap_err();
        assert!(matches!(err, AssetError::ImageSize(path) if path == "/bad.png"));
    }

    #[test]
    fn test_non_image_dimensions() {
        let site = Site::new("");
        site.write("assets/a.js", "1");
        let asset = Asset::new(&site.session, &["a.js"], options()).unwrap();
        assert_eq!((asset.width(), asset.height()), (0, 0));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("100"), Some(100));
        assert_eq!(leading_number(" 12.9em"), Some(12));
        assert_eq!(leading_number("50%"), Some(50));
        assert_eq!(leading_number("px"), None);
    }

    #[test]
    fn test_resize() {
        let site = Site::new("");
        site.write("assets/img/photo.png", png(400, 200));

        let asset = Asset::new(&site.session, &["img/photo.png"], options()).unwrap();
        let thumb = asset.resize(100).unwrap();

        assert_eq!(thumb.path(), "/assets/thumbnails/100/img/photo.png");
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
        assert_eq!(thumb.tags(), ["100x"]);
        // the receiver is untouched
        assert_eq!(asset.path(), "/img/photo.png");
        assert_eq!(asset.width(), 400);
    }

    #[test]
    fn test_resize_never_enlarges() {
        let site = Site::new("");
        site.write("assets/a.png", png(50, 50));

        let asset = Asset::new(&site.session, &["a.png"], options()).unwrap();
        let same = asset.resize(50).unwrap();
        assert_eq!(same.path(), asset.path());
        assert_eq!(same.content(), asset.content());
        assert!(same.tags().is_empty());
        assert!(site.store.is_empty());
    }

    #[test]
    fn test_resize_cached() {
        let site = Site::new("");
        site.write("assets/a.png", png(80, 80));

        let asset = Asset::new(&site.session, &["a.png"], options()).unwrap();
        let first = asset.resize(20).unwrap();
        assert_eq!(site.store.len(), 1);
        let second = asset.resize(20).unwrap();
        assert_eq!(site.store.len(), 1);
        assert_eq!(first.content(), second.content());
    }

    #[test]
    fn test_resize_not_image() {
        let site = Site::new("");
        site.write("assets/a.css", "a{}");
        let asset = Asset::new(&site.session, &["a.css"], options()).unwrap();
        assert!(matches!(asset.resize(10), Err(AssetError::NotImage(_))));
    }

    #[test]
    fn test_resize_gif() {
        let site = Site::new("");
        site.write("assets/anim.gif", encoded(40, 20, ImageFormat::Gif));

        let asset = Asset::new(&site.session, &["anim.gif"], options()).unwrap();
        let thumb = asset.resize(10).unwrap();
        assert_eq!(thumb.path(), "/assets/thumbnails/10/anim.gif");
        assert_eq!((thumb.width(), thumb.height()), (10, 5));
        assert_eq!(image::guess_format(thumb.content()).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_resize_ico_unsupported() {
        let site = Site::new("");
        site.write("assets/favicon.ico", encoded(32, 32, ImageFormat::Ico));
        let asset = Asset::new(&site.session, &["favicon.ico"], options()).unwrap();
        assert!(matches!(asset.resize(16), Err(AssetError::ResizeUnsupported(_))));
    }

    #[test]
    fn test_resize_quality_change_reencodes() {
        let site = Site::new("");
        site.write("assets/a.jpg", encoded(64, 64, ImageFormat::Jpeg));
        let low = crate::core::BuildSession::builder(Arc::new(crate::config::test_config_at(
            site.root(),
            "[assets.images]\nquality = 10",
        )))
        .store(site.store.clone())
        .build();

        let default = Asset::new(&site.session, &["a.jpg"], options()).unwrap();
        default.resize(32).unwrap();
        let other = Asset::new(&low, &["a.jpg"], options()).unwrap();
        other.resize(32).unwrap();
        assert_eq!(site.store.len(), 2);
    }

    #[test]
    fn test_resize_svg_unsupported() {
        let site = Site::new("");
        site.write("assets/logo.svg", r#"<svg width="100" height="100"/>"#);
        let asset = Asset::new(&site.session, &["logo.svg"], options()).unwrap();
        assert!(matches!(asset.resize(10), Err(AssetError::ResizeUnsupported(_))));
    }

    struct CountingOptimizer(Arc<AtomicUsize>);

    impl ImageOptimizer for CountingOptimizer {
        fn optimize(&self, file: &Path, _quality: u8) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            fs::write(file, b"smaller")?;
            Ok(())
        }
    }

    fn session_with(site: &Site, calls: Arc<AtomicUsize>) -> crate::core::BuildSession {
        crate::core::BuildSession::builder(Arc::new(site.session.config().clone()))
            .store(site.store.clone())
            .optimizer(CountingOptimizer(calls))
            .build()
    }

    #[test]
    fn test_optimize_reloads_file() {
        let site = Site::new("");
        site.write("assets/a.png", png(30, 10));
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session_with(&site, calls.clone());

        let mut asset = Asset::new(&session, &["a.png"], options()).unwrap();
        let file = site.dir.path().join("out.png");
        fs::write(&file, asset.content()).unwrap();
        asset.optimize(&file);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(asset.content(), b"smaller");
        assert_eq!(asset.size(), 7);
        assert!(asset.stages().optimized);
        assert_eq!(asset.tags(), ["30x", "optimized"]);

        // idempotent
        asset.optimize(&file);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_optimize_cache_hit_writes_file() {
        let site = Site::new("");
        site.write("assets/a.png", png(30, 10));
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session_with(&site, calls.clone());

        let file = site.dir.path().join("out.png");
        let mut first = Asset::new(&session, &["a.png"], options()).unwrap();
        fs::write(&file, first.content()).unwrap();
        first.optimize(&file);

        let other = site.dir.path().join("other.png");
        let mut second = Asset::new(&session, &["a.png"], options()).unwrap();
        fs::write(&other, second.content()).unwrap();
        second.optimize(&other);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fs::read(&other).unwrap(), b"smaller");
        assert!(second.stages().optimized);
    }

    #[test]
    fn test_optimize_quality_change_reruns() {
        let site = Site::new("");
        site.write("assets/a.png", png(30, 10));
        let calls = Arc::new(AtomicUsize::new(0));
        let first = session_with(&site, calls.clone());
        let config = crate::config::test_config_at(site.root(), "[assets.images]\nquality = 40");
        let second = crate::core::BuildSession::builder(Arc::new(config))
            .store(site.store.clone())
            .optimizer(CountingOptimizer(calls.clone()))
            .build();

        for session in [&first, &second] {
            let file = site.dir.path().join("out.png");
            let mut asset = Asset::new(session, &["a.png"], options()).unwrap();
            fs::write(&file, asset.content()).unwrap();
            asset.optimize(&file);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shrink_note() {
        assert_eq!(shrink_note(12_001, 8_000), " (13 Ko -> 8 Ko)");
        assert_eq!(shrink_note(2048, 1), " (3 Ko -> 1 Ko)");
        assert_eq!(shrink_note(500, 500), "");
        assert_eq!(shrink_note(500, 900), "");
    }

    #[test]
    fn test_optimize_failure_is_tolerated() {
        struct Failing;
        impl ImageOptimizer for Failing {
            fn optimize(&self, _file: &Path, _quality: u8) -> anyhow::Result<()> {
                anyhow::bail!("no encoder")
            }
        }

        let site = Site::new("");
        site.write("assets/a.png", png(4, 4));
        let session = crate::core::BuildSession::builder(Arc::new(site.session.config().clone()))
            .store(site.store.clone())
            .optimizer(Failing)
            .build();

        let mut asset = Asset::new(&session, &["a.png"], options()).unwrap();
        let before = asset.content().to_vec();
        asset.optimize(&site.dir.path().join("out.png"));
        assert_eq!(asset.content(), before);
        assert!(!asset.stages().optimized);
    }

    #[test]
    fn test_optimize_skips_non_images() {
        let site = Site::new("");
        site.write("assets/a.css", "a{}");
        let mut asset = Asset::new(&site.session, &["a.css"], options()).unwrap();
        asset.optimize(&site.dir.path().join("a.css"));
        assert!(!asset.stages().optimized);
    }

    #[test]
    fn test_reencode_optimizer_keeps_smaller() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.png");
        let original = png(64, 64);
        fs::write(&file, &original).unwrap();

        ReencodeOptimizer.optimize(&file, 75).unwrap();
        let after = fs::read(&file).unwrap();
        assert!(after.len() <= original.len());
        assert_eq!(image::load_from_memory(&after).unwrap().width(), 64);
    }
}
