//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `join_file`)
//! - [`url`]: Public URL paths (`join_path`, `sanitize`, `is_remote`)
//! - [`slug`]: Slugification (`slugify`)

pub mod fs;
pub mod slug;
pub mod url;

pub use fs::{join_file, normalize_path};
pub use slug::slugify;
pub use url::{ensure_leading_slash, is_remote, join_path, sanitize};
