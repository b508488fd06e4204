//! FILENAME: persistence/src/lib.rs
//! Survey Dashboard Persistence Module
//!
//! Handles saving and loading codebooks: JSON for session persistence,
//! CSV for bulk editing in external spreadsheet tools.

mod codebook_io;
mod error;

pub use codebook_io::{
    export_codebook_template, export_codebook_template_file, import_codebook_csv,
    import_codebook_csv_file, load_codebook, save_codebook,
};
pub use error::PersistenceError;
