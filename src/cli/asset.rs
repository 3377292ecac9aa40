//! `kiln asset`: build, save and print one asset.

use std::sync::Arc;

use anyhow::{Context, Result};
use kiln::asset::{Asset, AssetOptions};
use kiln::cache::MemoryStore;
use kiln::config::SiteConfig;
use kiln::core::{BuildMode, BuildOptions, BuildSession};
use kiln::debug;

use super::AssetArgs;

pub fn build_asset(args: &AssetArgs, config: Arc<SiteConfig>) -> Result<()> {
    let mode = if args.debug {
        BuildMode::DEVELOPMENT
    } else {
        BuildMode::PRODUCTION
    };
    let build_options = BuildOptions::default().dry_run(args.dry_run).mode(mode);

    let mut builder = BuildSession::builder(config.clone()).options(build_options);
    if args.no_cache {
        debug!("cache"; "using in-memory store");
        builder = builder.store(Arc::new(MemoryStore::new()));
    }
    let session = builder.build();

    let options = asset_options(args, &config);
    let mut asset = Asset::new(&session, &args.paths, options)
        .with_context(|| format!("failed to build {}", args.paths.join(", ")))?;

    if let Some(width) = args.resize {
        asset = asset
            .resize(width)
            .with_context(|| format!("failed to resize {asset} to {width}px"))?;
    }
    asset
        .save()
        .with_context(|| format!("failed to save {asset}"))?;

    println!("{asset}");
    if let Some(algo) = args.integrity {
        println!("{}", asset.integrity(algo));
    }
    Ok(())
}

/// Config defaults overridden by the flags that were given.
fn asset_options(args: &AssetArgs, config: &SiteConfig) -> AssetOptions {
    let mut options = AssetOptions::from_config(config).with_ignore_missing(args.ignore_missing);
    if let Some(fingerprint) = args.fingerprint {
        options = options.with_fingerprint(fingerprint);
    }
    if let Some(minify) = args.minify {
        options = options.with_minify(minify);
    }
    if let Some(optimize) = args.optimize {
        options = options.with_optimize(optimize);
    }
    if let Some(filename) = &args.filename {
        options = options.with_filename(filename.clone());
    }
    options
}
