//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `build`    | `[build]`      | Project directories and theme order      |
//! | `language` | `[language]`   | Default language code                    |
//! | `assets`   | `[assets]`     | Asset pipeline toggles (compile, images) |
//! | `output`   | `[output]`     | Page output formats                      |

mod assets;
mod build;
mod language;
mod output;

pub use assets::{
    AssetsConfig, CompileConfig, FingerprintConfig, ImagesConfig, MinifyConfig, OptimizeConfig,
    OutputStyle,
};
pub use build::BuildConfig;
pub use language::LanguageConfig;
pub use output::{OutputConfig, OutputFormat};
