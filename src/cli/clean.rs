//! `kiln clean`: drop the content store.

use anyhow::{Context, Result};
use kiln::cache::FileStore;
use kiln::config::SiteConfig;
use kiln::log;

pub fn clean_store(config: &SiteConfig) -> Result<()> {
    let store = FileStore::new(config.store_dir());
    store
        .clear()
        .with_context(|| format!("failed to remove {}", store.dir().display()))?;
    log!("cache"; "removed {}", store.dir().display());
    Ok(())
}
