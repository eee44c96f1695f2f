//! Directory tree traversal

mod walk;

pub use walk::{walk, DirListing, Walk, WalkOrder};
