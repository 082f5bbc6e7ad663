//! Domain building blocks for the jotter notes backend.
//!
//! Everything here is storage- and transport-agnostic: shared id and
//! timestamp types, the error taxonomy, input validation helpers, the
//! default category seed set, and the versioned category cache.

pub mod cache;
pub mod categories;
pub mod error;
pub mod notes;
pub mod roles;
pub mod types;
pub mod validation;
