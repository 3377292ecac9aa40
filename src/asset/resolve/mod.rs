//! Asset reference resolution.
//!
//! A reference is either a remote URL or a public path looked up in the
//! project and theme directories. First match wins:
//!
//! 1. remote URL → cache slot (fetched on first use)
//! 2. `assets/`
//! 3. `themes/<theme>/assets/`, in theme order
//! 4. `static/`
//! 5. `themes/<theme>/static/`, in theme order

mod remote;

pub use remote::{HttpFetcher, RemoteFetcher};

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use url::Url;

use super::{AssetError, MediaType};
use crate::config::SiteConfig;
use crate::debug;
use crate::utils::path::{ensure_leading_slash, is_remote, join_file};

/// Bytes read when guessing a type from content.
const SNIFF_LEN: usize = 32;

/// A resolved reference, before its content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Absolute local file.
    pub file: PathBuf,
    /// Public path before any stage.
    pub path: String,
    pub ext: String,
    pub media: MediaType,
    pub size: u64,
}

impl Located {
    pub fn read(&self) -> Result<Vec<u8>, AssetError> {
        fs::read(&self.file).map_err(|err| AssetError::Io(self.file.clone(), err))
    }
}

pub struct PathResolver<'a> {
    config: &'a SiteConfig,
    fetcher: &'a dyn RemoteFetcher,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a SiteConfig, fetcher: &'a dyn RemoteFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Local file for `reference`, downloading remote references on first use.
    pub fn find(&self, reference: &str) -> Result<Option<PathBuf>, AssetError> {
        if is_remote(reference) {
            return self.find_remote(reference);
        }

        let config = self.config;
        let found = std::iter::once(config.assets_dir().to_path_buf())
            .chain(config.theme_dirs("assets"))
            .chain(std::iter::once(config.static_dir().to_path_buf()))
            .chain(config.theme_dirs("static"))
            .map(|dir| join_file(&dir, reference))
            .find(|file| file.is_file());

        Ok(found)
    }

    /// Resolve and classify `reference` without reading its content.
    pub fn locate(&self, reference: &str, force_slash: bool) -> Result<Option<Located>, AssetError> {
        let Some(file) = self.find(reference)? else {
            return Ok(None);
        };

        let path = match Url::parse(reference) {
            Ok(url) if is_remote(reference) => {
                remote::public_path(&self.config.assets.target, &url)
            }
            _ if force_slash => ensure_leading_slash(reference),
            _ => reference.to_string(),
        };

        let ext = extension(&path);
        let size = fs::metadata(&file)
            .map_err(|err| AssetError::Io(file.clone(), err))?
            .len();

        let mut media = MediaType::from_extension(&ext);
        if !media.is_image()
            && media.kind != "text"
            && let Some(sniffed) = sniff_image(&file)
        {
            debug!("asset"; "{path} looks like {}", sniffed.subtype);
            media = sniffed;
        }

        Ok(Some(Located {
            media,
            file,
            path,
            ext,
            size,
        }))
    }

    fn find_remote(&self, reference: &str) -> Result<Option<PathBuf>, AssetError> {
        let url = Url::parse(reference).map_err(|err| AssetError::Remote {
            url: reference.to_string(),
            message: err.to_string(),
        })?;
        let slot = remote::slot_path(&self.config.remote_cache_dir(), &url);
        if slot.is_file() {
            debug!("remote"; "cached {reference}");
            return Ok(Some(slot));
        }

        if !self.fetcher.exists(reference) {
            return Ok(None);
        }
        let content = self.fetcher.fetch(reference)?;
        if content.len() <= 1 {
            return Err(AssetError::EmptyRemoteContent(reference.to_string()));
        }

        write_slot(&slot, &content)?;
        debug!("remote"; "fetched {reference} ({} bytes)", content.len());
        Ok(Some(slot))
    }
}

/// Extension of the last path segment, without the dot.
fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Image type from the first bytes of `file`, for paths whose extension
/// says nothing (remote URLs such as `/photo?id=1`).
fn sniff_image(file: &Path) -> Option<MediaType> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(file)
        .ok()?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .ok()?;
    let format = image::guess_format(&head).ok()?;
    let ext = format.extensions_str().first()?;
    Some(MediaType::from_extension(ext))
}

fn write_slot(slot: &Path, content: &[u8]) -> Result<(), AssetError> {
    if let Some(parent) = slot.parent() {
        fs::create_dir_all(parent).map_err(|err| AssetError::Io(parent.to_path_buf(), err))?;
    }
    fs::write(slot, content).map_err(|err| AssetError::Io(slot.to_path_buf(), err))
}
