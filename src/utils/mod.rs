//! Utility modules shared by the asset pipeline.

pub mod hash;
pub mod mime;
pub mod path;
