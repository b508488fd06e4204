//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the survey data model.
//! CONTEXT: Re-exports the shared types used by the transform and
//! persistence crates: raw values, datasets with stable row ids, the
//! codebook, the filter evaluator, and the reactive session store.

pub mod codebook;
pub mod dataset;
pub mod filter;
pub mod store;
pub mod value;

// Re-export commonly used types at the crate root
pub use codebook::Codebook;
pub use dataset::{Dataset, Row, RowId};
pub use filter::FilterSet;
pub use store::{DataStore, Listener, PersistHook};
pub use value::RawValue;
