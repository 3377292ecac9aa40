//! Page output locations.
//!
//! Conversion and templating happen elsewhere; this module only decides
//! where a rendered page is written and under which URL it is served.

mod page;

pub use page::{OutputPathResolver, PageItem, PageRef};
pub use crate::config::OutputFormat;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format `{0}`")]
    UnknownFormat(String),
}
