//! Content-addressed cache for asset transformations.
//!
//! | Module  | Purpose                                                   |
//! |---------|-----------------------------------------------------------|
//! | `store` | `ContentStore` trait, file-backed and in-memory stores    |
//! | `key`   | Stable cache keys from bundle identity, tags and content  |
//! | `asset` | Typed `AssetData` records on top of a store               |
//!
//! Stores are write-once, read-many: a key's value is never rewritten,
//! and entries are never evicted.

mod asset;
mod key;
mod store;

pub use asset::AssetCache;
pub use key::CacheKey;
pub use store::{ContentStore, FileStore, MemoryStore};
