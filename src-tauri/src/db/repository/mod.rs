//! Repository layer — entity-scoped database operations.
//!
//! Each sub-module owns the fixed column set of one entity and wraps the
//! generic row mapper with statically typed functions, so column names
//! stay checked at one place per table.

mod annotation;
mod case;
mod meld;
mod mri;
mod patient;

pub use annotation::*;
pub use case::*;
pub use meld::*;
pub use mri::*;
pub use patient::*;
