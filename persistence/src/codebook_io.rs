//! FILENAME: persistence/src/codebook_io.rs
//! PURPOSE: Codebook save/load (JSON) and bulk import/export (CSV).
//! CONTEXT: The codebook is the only user artifact this system persists;
//! raw survey data is re-loaded from its source file each session. The
//! JSON layout is the `Codebook` serde shape and must stay readable by
//! older saves, so unknown fields are ignored and missing ones default.
//!
//! The CSV side is for bulk editing in a spreadsheet: a template with one
//! row per dataset column goes out, a filled-in recoding table comes back.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use engine::Codebook;

use crate::error::PersistenceError;

// ============================================================================
// JSON SAVE / LOAD
// ============================================================================

/// Writes the codebook as pretty-printed JSON.
pub fn save_codebook(path: &Path, codebook: &Codebook) -> Result<(), PersistenceError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, codebook)?;
    writer.flush()?;
    Ok(())
}

/// Loads a codebook saved by [`save_codebook`]. A file with only a
/// `mapping` or only a `questions` key loads fine; the other half
/// defaults to empty.
pub fn load_codebook(path: &Path) -> Result<Codebook, PersistenceError> {
    let file = File::open(path)?;
    let codebook = serde_json::from_reader(BufReader::new(file))?;
    Ok(codebook)
}

// ============================================================================
// CSV IMPORT / EXPORT
// ============================================================================

const TEMPLATE_HEADERS: [&str; 4] = ["Variable", "Value", "Label", "Question"];

/// Imports codebook entries from a `Variable,Value,Label,Question` CSV
/// into an existing codebook. Header matching is case-insensitive.
///
/// Rows with a variable, value and label set a mapping entry; rows with a
/// variable and question set the question text (the same row can do
/// both). Rows missing the required fields are skipped, not errors.
/// Returns the number of rows that contributed at least one entry.
pub fn import_codebook_csv<R: Read>(
    reader: R,
    codebook: &mut Codebook,
) -> Result<usize, PersistenceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let variable_idx = column("variable").ok_or_else(|| {
        PersistenceError::InvalidFormat("codebook CSV has no Variable column".to_string())
    })?;
    let value_idx = column("value");
    let label_idx = column("label");
    let question_idx = column("question");

    let field = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        let text = record.get(idx?)?.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    };

    let mut applied = 0;
    for record in csv_reader.records() {
        let record = record?;
        let Some(variable) = field(&record, Some(variable_idx)) else {
            continue;
        };
        let value = field(&record, value_idx);
        let label = field(&record, label_idx);
        let question = field(&record, question_idx);

        let mut touched = false;
        if let (Some(value), Some(label)) = (value, label) {
            codebook.set_label(&variable, &value, &label);
            touched = true;
        }
        if let Some(question) = question {
            codebook.set_question(&variable, &question);
            touched = true;
        }
        if touched {
            applied += 1;
        }
    }

    log::info!("codebook CSV import applied {} rows", applied);
    Ok(applied)
}

/// Imports codebook entries from a CSV file on disk.
pub fn import_codebook_csv_file(
    path: &Path,
    codebook: &mut Codebook,
) -> Result<usize, PersistenceError> {
    let file = File::open(path)?;
    import_codebook_csv(BufReader::new(file), codebook)
}

/// Writes an empty codebook template: the header row plus one blank row
/// per dataset column, ready to fill in and re-import. All fields are
/// quoted so column names containing delimiters survive the round trip.
pub fn export_codebook_template<W: Write>(
    writer: W,
    headers: &[String],
) -> Result<(), PersistenceError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    csv_writer.write_record(TEMPLATE_HEADERS)?;
    for header in headers {
        csv_writer.write_record([header.as_str(), "", "", ""])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the codebook template to a file on disk.
pub fn export_codebook_template_file(
    path: &Path,
    headers: &[String],
) -> Result<(), PersistenceError> {
    let file = File::create(path)?;
    export_codebook_template(BufWriter::new(file), headers)
}
