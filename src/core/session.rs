//! Build session.
//!
//! One session per build run. It owns the configuration, the content store
//! handle every stage memoizes through, and the external collaborators
//! (remote fetcher, SCSS compiler, image optimizer), so nothing in the
//! pipeline reaches for a global.

use std::sync::Arc;

use dashmap::DashMap;

use super::BuildOptions;
use crate::asset::resolve::{HttpFetcher, PathResolver, RemoteFetcher};
use crate::asset::stage::{GrassCompiler, ImageOptimizer, ReencodeOptimizer, ScssCompiler};
use crate::asset::AssetData;
use crate::cache::{AssetCache, ContentStore, FileStore};
use crate::config::SiteConfig;

pub struct BuildSession {
    config: Arc<SiteConfig>,
    options: BuildOptions,
    store: Arc<dyn ContentStore>,
    cache: AssetCache,
    /// Assembled bundles of this run, keyed by their joined source list.
    bundles: DashMap<String, AssetData>,
    fetcher: Box<dyn RemoteFetcher>,
    compiler: Box<dyn ScssCompiler>,
    optimizer: Box<dyn ImageOptimizer>,
}

impl BuildSession {
    pub fn builder(config: Arc<SiteConfig>) -> BuildSessionBuilder {
        BuildSessionBuilder {
            config,
            options: BuildOptions::default(),
            store: None,
            fetcher: None,
            compiler: None,
            optimizer: None,
        }
    }

    /// Session with a file store and the default collaborators.
    pub fn new(config: Arc<SiteConfig>, options: BuildOptions) -> Self {
        Self::builder(config).options(options).build()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn is_debug(&self) -> bool {
        self.options.mode.is_debug()
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.config, self.fetcher.as_ref())
    }

    pub fn compiler(&self) -> &dyn ScssCompiler {
        self.compiler.as_ref()
    }

    pub fn optimizer(&self) -> &dyn ImageOptimizer {
        self.optimizer.as_ref()
    }

    /// Bundle assembled earlier in this run.
    pub(crate) fn bundle(&self, key: &str) -> Option<AssetData> {
        self.bundles.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn remember_bundle(&self, key: String, data: AssetData) {
        self.bundles.insert(key, data);
    }
}

/// Builder for [`BuildSession`]; unset parts get their defaults.
pub struct BuildSessionBuilder {
    config: Arc<SiteConfig>,
    options: BuildOptions,
    store: Option<Arc<dyn ContentStore>>,
    fetcher: Option<Box<dyn RemoteFetcher>>,
    compiler: Option<Box<dyn ScssCompiler>>,
    optimizer: Option<Box<dyn ImageOptimizer>>,
}

impl BuildSessionBuilder {
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn fetcher(mut self, fetcher: impl RemoteFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn compiler(mut self, compiler: impl ScssCompiler + 'static) -> Self {
        self.compiler = Some(Box::new(compiler));
        self
    }

    pub fn optimizer(mut self, optimizer: impl ImageOptimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    pub fn build(self) -> BuildSession {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(FileStore::new(self.config.store_dir())));
        BuildSession {
            cache: AssetCache::new(store.clone()),
            store,
            options: self.options,
            bundles: DashMap::new(),
            fetcher: self.fetcher.unwrap_or_else(|| Box::new(HttpFetcher::default())),
            compiler: self.compiler.unwrap_or_else(|| Box::new(GrassCompiler)),
            optimizer: self
                .optimizer
                .unwrap_or_else(|| Box::new(ReencodeOptimizer)),
            config: self.config,
        }
    }
}
