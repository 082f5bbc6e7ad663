//! Domain services sitting between handlers and repositories.
//!
//! - [`categories`] -- category visibility, the cached listing, and every
//!   category mutation (each followed by a cache version bump).
//! - [`notes`] -- owner-scoped note reads and writes, gated on category
//!   visibility.

pub mod categories;
pub mod notes;
