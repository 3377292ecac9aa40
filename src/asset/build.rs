//! Bundle assembly.

use super::resolve::{Located, PathResolver};
use super::{Asset, AssetData, AssetError, AssetOptions};
use crate::core::BuildSession;
use crate::debug;

impl<'s> Asset<'s> {
    /// Build an asset from one or more source references.
    ///
    /// Members must share media kind and extension. Several members are
    /// concatenated in order and named `/styles.<ext>` or `/scripts.<ext>`
    /// unless `options.filename` is set. The configured stages run right
    /// away, except image optimization which waits for [`Asset::save`].
    ///
    /// # Example
    /// ```ignore
    /// let options = AssetOptions::from_config(session.config());
    /// let asset = Asset::new(&session, &["js/a.js", "js/b.js"], options)?;
    /// assert!(asset.path().starts_with("/scripts."));
    /// ```
    pub fn new<S: AsRef<str>>(
        session: &'s BuildSession,
        references: &[S],
        options: AssetOptions,
    ) -> Result<Self, AssetError> {
        let references: Vec<&str> = references.iter().map(AsRef::as_ref).collect();
        if references.is_empty() || references.iter().any(|r| r.is_empty()) {
            return Err(AssetError::EmptyPath);
        }

        let base_key = references.join("_");
        let memo_key = format!("{base_key}|{}|{}", options.filename, options.force_slash);
        let data = match session.bundle(&memo_key) {
            Some(data) => {
                debug!("asset"; "reusing bundle {base_key}");
                data
            }
            None => {
                let data = assemble(&session.resolver(), &references, &options)?;
                session.remember_bundle(memo_key, data.clone());
                data
            }
        };

        let mut asset = Self {
            session,
            data,
            options,
            base_key,
        };

        if asset.options.fingerprint {
            asset.fingerprint();
        }
        if session.config().assets.compile.enable {
            asset.compile()?;
        }
        if asset.options.minify {
            asset.minify()?;
        }
        Ok(asset)
    }
}

/// Resolve, check and concatenate every member.
fn assemble(
    resolver: &PathResolver<'_>,
    references: &[&str],
    options: &AssetOptions,
) -> Result<AssetData, AssetError> {
    let mut data = AssetData::default();
    let mut previous: Option<Located> = None;

    for reference in references {
        let Some(located) = resolver.locate(reference, options.force_slash)? else {
            if options.ignore_missing {
                debug!("asset"; "ignoring missing {reference}");
                data.missing = true;
                continue;
            }
            return Err(AssetError::NotFound(reference.to_string()));
        };

        // Checked before reading, so a mismatched member is never loaded
        if let Some(prev) = &previous {
            if located.media.kind != prev.media.kind {
                return Err(AssetError::BundleType {
                    expected: prev.media.kind.clone(),
                    found: located.media.kind.clone(),
                });
            }
            if located.ext != prev.ext {
                return Err(AssetError::BundleExtension {
                    expected: prev.ext.clone(),
                    found: located.ext.clone(),
                });
            }
        }

        let content = located.read()?;
        data.size += located.size;
        data.content_source.extend_from_slice(&content);

        if data.files.is_empty() {
            data.filename = located.path.clone();
            data.path_source = located.path.clone();
            data.path = located.path.clone();
            data.ext = located.ext.clone();
            data.media = located.media.clone();
        }
        data.files.push(located.file.clone());
        previous = Some(located);
    }

    if data.missing {
        return Ok(AssetData::missing());
    }

    data.content = data.content_source.clone();

    if !options.filename.is_empty() {
        data.path = format!("/{}", options.filename.trim_start_matches('/'));
    } else if references.len() > 1 {
        data.path = match data.ext.as_str() {
            "scss" | "css" => format!("/styles.{}", data.ext),
            "js" => format!("/scripts.{}", data.ext),
            other => return Err(AssetError::BundleUnsupported(other.to_string())),
        };
    }

    if data.media.is_image() {
        let (width, height) = super::stage::dimensions(&data)?;
        data.width = width;
        data.height = height;
    }

    Ok(data)
}
