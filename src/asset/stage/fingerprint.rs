//! Content-hash fingerprinting.

use super::replace_ext;
use crate::asset::Asset;
use crate::utils::hash::fingerprint;

const TAG: &str = "fingerprinted";

impl Asset<'_> {
    /// Insert a digest of `content_source` before the extension.
    ///
    /// Pure function of the source bytes, so nothing is cached.
    pub fn fingerprint(&mut self) -> &mut Self {
        if self.data.stages.fingerprinted || self.data.missing {
            return self;
        }

        let digest = fingerprint(&self.data.content_source);
        let ext = &self.data.ext;
        self.data.path = replace_ext(&self.data.path, ext, &format!(".{digest}.{ext}"));
        self.data.stages.fingerprinted = true;
        Self::push_tag(&mut self.data, TAG);
        self
    }
}
