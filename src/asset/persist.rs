//! Writing assets to the output tree.

use std::fs;
use std::io;
use std::path::Path;

use super::{Asset, AssetError};
use crate::utils::path::join_file;
use crate::{debug, log};

impl Asset<'_> {
    /// Write the current content under the output directory.
    ///
    /// Existing files are kept, so static files and earlier writes win.
    /// Nothing is written for dry runs or placeholders. With
    /// `ignore_missing` a write failure is logged instead of returned.
    pub fn save(&mut self) -> Result<(), AssetError> {
        if self.data.missing || self.data.path.is_empty() {
            return Ok(());
        }
        let session = self.session;
        let file = join_file(session.config().output_dir(), &self.data.path);
        if session.is_dry_run() {
            debug!("asset"; "dry run, not saving {}", self.data.path);
            return Ok(());
        }
        if file.exists() {
            debug!("asset"; "{} already exists", file.display());
            return Ok(());
        }

        if let Err(source) = write(&file, &self.data.content) {
            if self.options.ignore_missing {
                debug!("asset"; "can't save {}: {source}", file.display());
                return Ok(());
            }
            return Err(AssetError::Save { path: file, source });
        }
        debug!("asset"; "saved {}", self.data.path);

        if self.options.optimize {
            self.optimize(&file);
        }
        Ok(())
    }

    /// Save and return the public path, for templates.
    pub fn publish(&mut self) -> String {
        if let Err(err) = self.save() {
            log!("error"; "{err}");
        }
        self.data.path.clone()
    }
}

fn write(file: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file, content)
}
