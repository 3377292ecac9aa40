//! Remote asset download.
//!
//! Remote references are fetched once and kept in a cache slot named after
//! their URL, so later builds read them from disk.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::asset::AssetError;
use crate::utils::path::{join_path, sanitize, slugify};

/// Timeout for a whole remote request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetches remote assets.
pub trait RemoteFetcher: Send + Sync {
    /// Whether the URL points to something fetchable.
    fn exists(&self, url: &str) -> bool;

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// HTTP(S) fetcher backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }
}

impl HttpFetcher {
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl RemoteFetcher for HttpFetcher {
    fn exists(&self, url: &str) -> bool {
        match self.agent.head(url).call() {
            Ok(_) => true,
            // servers that refuse HEAD still get a GET
            Err(ureq::Error::StatusCode(405 | 501)) => true,
            Err(_) => false,
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let remote_err = |message: String| AssetError::Remote {
            url: url.to_string(),
            message,
        };

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| remote_err(e.to_string()))?;
        let mut reader = response.into_body().into_reader();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| remote_err(e.to_string()))?;
        Ok(bytes)
    }
}

/// Cache slot file for a remote URL: `<dir>/<slug(host + path + "-" + query)>`.
pub fn slot_path(dir: &Path, url: &Url) -> PathBuf {
    let name = format!(
        "{}{}-{}",
        url.host_str().unwrap_or_default(),
        url.path(),
        url.query().unwrap_or_default()
    );
    dir.join(slugify(&name))
}

/// Public path of a remote asset under `target`.
///
/// `https://fonts.googleapis.com/css2?family=Inter` with target `assets`
/// becomes `/assets/fonts.googleapis.com/css2/family-inter.css`: the query is
/// slugged into a file name, and stylesheet URLs (path containing `/css`)
/// get a `.css` extension.
pub fn public_path(target: &str, url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let mut path = sanitize(&join_path(&[target, host, url.path()]));

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        path = join_path(&[path.as_str(), slugify(query).as_str()]);
        if url.path().contains("/css") {
            path.push_str(".css");
        }
    }

    format!("/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_slot_path() {
        let dir = Path::new("/cache/assets/remote");
        assert_eq!(
            slot_path(dir, &url("https://fonts.googleapis.com/css2?family=Inter:wght@400")),
            dir.join("fonts-googleapis-com-css2-family-inter-wght-400")
        );
        assert_eq!(
            slot_path(dir, &url("https://example.com/js/app.js")),
            dir.join("example-com-js-app-js")
        );
    }

    #[test]
    fn test_public_path_plain() {
        assert_eq!(
            public_path("assets", &url("https://cdn.example.com/lib/app.js")),
            "/assets/cdn.example.com/lib/app.js"
        );
    }

    #[test]
    fn test_public_path_query_css() {
        assert_eq!(
            public_path("assets", &url("https://fonts.googleapis.com/css2?family=Inter")),
            "/assets/fonts.googleapis.com/css2/family-inter.css"
        );
        assert_eq!(
            public_path("assets", &url("https://example.com/img?w=10")),
            "/assets/example.com/img/w-10"
        );
    }

    #[test]
    fn test_public_path_sanitized() {
        assert_eq!(
            public_path("assets", &url("https://example.com/a:b*c.png")),
            "/assets/example.com/a_b_c.png"
        );
    }
}
