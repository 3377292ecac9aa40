//! Build session and mode.

mod mode;
mod session;

pub use mode::{BuildMode, BuildOptions};
pub use session::{BuildSession, BuildSessionBuilder};
