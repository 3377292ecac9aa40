//! Subresource integrity and data URLs.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::asset::{Asset, AssetError};

/// Hash algorithm for [`Asset::integrity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegrityAlgo {
    Sha256,
    #[default]
    Sha384,
    Sha512,
}

impl IntegrityAlgo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn hash(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(bytes).to_vec(),
            Self::Sha384 => Sha384::digest(bytes).to_vec(),
            Self::Sha512 => Sha512::digest(bytes).to_vec(),
        }
    }
}

impl FromStr for IntegrityAlgo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(format!("unsupported integrity algorithm '{other}'")),
        }
    }
}

impl fmt::Display for IntegrityAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Asset<'_> {
    /// `integrity` attribute value for the current content.
    pub fn integrity(&self, algo: IntegrityAlgo) -> String {
        format!("{algo}-{}", STANDARD.encode(algo.hash(&self.data.content)))
    }

    /// Inline the image as a `data:` URL.
    pub fn data_url(&self) -> Result<String, AssetError> {
        if !self.is_image() {
            return Err(AssetError::NotImage(self.data.path.clone()));
        }
        Ok(format!(
            "data:{};base64,{}",
            self.data.media.subtype,
            STANDARD.encode(&self.data.content)
        ))
    }
}
