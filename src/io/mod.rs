//! Input/output helpers.
//!
//! - request loading + cell coercion (`ingest`)
//! - JSON response assembly and export (`response`)

pub mod ingest;
pub mod response;

pub use ingest::*;
pub use response::*;
