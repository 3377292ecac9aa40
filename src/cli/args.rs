//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use kiln::asset::IntegrityAlgo;
use std::path::PathBuf;

/// Kiln asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build one asset or bundle and write it to the output directory
    #[command(visible_alias = "a")]
    Asset {
        #[command(flatten)]
        args: AssetArgs,
    },

    /// Show where a page is written and served
    #[command(visible_alias = "o")]
    Output {
        #[command(flatten)]
        args: OutputArgs,
    },

    /// Remove the content store
    Clean,
}

/// Asset command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct AssetArgs {
    /// Asset references, bundled in order (local paths or http(s) URLs)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Explicit output file name (e.g. `js/bundle.js`)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Insert a content hash into the file name
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub fingerprint: Option<bool>,

    /// Minify CSS and JS
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Optimize images after writing
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub optimize: Option<bool>,

    /// Turn unresolved references into an empty placeholder
    #[arg(short, long)]
    pub ignore_missing: bool,

    /// Write a thumbnail of this width instead of the original image
    #[arg(short, long, value_name = "WIDTH")]
    pub resize: Option<u32>,

    /// Also print the integrity hash (sha256, sha384, sha512)
    #[arg(long, value_name = "ALGO", num_args = 0..=1, default_missing_value = "sha384")]
    pub integrity: Option<IntegrityAlgo>,

    /// Run every stage but write nothing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Development build (keeps source maps unminified)
    #[arg(short, long)]
    pub debug: bool,

    /// Use an in-memory store instead of the persistent one
    #[arg(long)]
    pub no_cache: bool,
}

/// Output command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Page path without extension (empty for the homepage)
    #[arg(value_name = "PAGE_PATH", default_value = "")]
    pub path: String,

    /// Output format name from `[output.formats]`
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Page language code
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Use an ugly URL (`404.html` instead of `404/index.html`)
    #[arg(short, long)]
    pub ugly: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_asset(&self) -> bool {
        matches!(self.command, Commands::Asset { .. })
    }
    pub const fn is_output(&self) -> bool {
        matches!(self.command, Commands::Output { .. })
    }
    pub const fn is_clean(&self) -> bool {
        matches!(self.command, Commands::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_args() {
        let cli = Cli::parse_from([
            "kiln", "asset", "a.js", "b.js", "--minify=false", "--fingerprint", "--integrity",
        ]);
        let Commands::Asset { args } = cli.command else {
            panic!("expected asset command");
        };
        assert_eq!(args.paths, ["a.js", "b.js"]);
        assert_eq!(args.minify, Some(false));
        assert_eq!(args.fingerprint, Some(true));
        assert_eq!(args.optimize, None);
        assert_eq!(args.integrity, Some(IntegrityAlgo::Sha384));
    }

    #[test]
    fn test_output_args() {
        let cli = Cli::parse_from(["kiln", "-C", "site/kiln.toml", "output", "404", "--ugly"]);
        assert_eq!(cli.config, PathBuf::from("site/kiln.toml"));
        let Commands::Output { args } = cli.command else {
            panic!("expected output command");
        };
        assert_eq!(args.path, "404");
        assert_eq!(args.format, "html");
        assert!(args.ugly);
    }

    #[test]
    fn test_asset_requires_path() {
        assert!(Cli::try_parse_from(["kiln", "asset"]).is_err());
    }
}
