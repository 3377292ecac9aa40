//! Kiln - asset pipeline for static sites.
//!
//! Resolves local, theme and remote asset references, bundles them,
//! runs them through fingerprinting, SCSS compilation, minification and
//! image processing, memoizes every stage in a persistent content store,
//! and writes the results to the output tree.
//!
//! # Modules
//!
//! | Module   | Purpose                                              |
//! |----------|------------------------------------------------------|
//! | `config` | `kiln.toml` loading and validation                   |
//! | `core`   | Build mode, options and the per-run session          |
//! | `cache`  | Content store and typed asset records                |
//! | `asset`  | Resolution, bundling, stages and persistence         |
//! | `render` | Page output files and URLs                           |
//! | `utils`  | Hashing, MIME types and path helpers                 |

#[macro_use]
pub mod logger;

pub mod asset;
pub mod cache;
pub mod config;
pub mod core;
pub mod render;
pub mod utils;
