//! will-domain
//!
//! Pure data model for an in-progress will (FormState and its sub-objects),
//! the wizard section keys and cursor, and the stored record projection.
//! No I/O, no CLI, no storage.

pub mod common;
pub mod field;
pub mod form;
pub mod record;

pub use common::*;
pub use field::*;
pub use form::*;
pub use record::*;
