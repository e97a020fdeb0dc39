//! Summary and audit CSV writers

use crate::config::OutputConfig;
use crate::core::aggregate::{AggregateOutput, ItemRecord, RankedEntry};
use crate::domain::{MedTallyError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header of the ranked summary file
pub const SUMMARY_HEADERS: [&str; 2] = ["med_key", "cantidad"];

/// Header of the raw item records file
pub const RECORD_HEADERS: [&str; 8] = [
    "codigo_oc",
    "fecha_oc",
    "organismo",
    "proveedor",
    "med_key",
    "cantidad",
    "unidad",
    "precio_neto",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Paths of the files written by [`write_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Ranked summary
    pub summary: PathBuf,
    /// Raw item records
    pub records: PathBuf,
}

/// Writes the BOM and the header row
///
/// Headers are written by hand so an empty table still gets them; rows are
/// serialized from the serde column names after that.
fn bom_writer<W: Write>(mut out: W, headers: &[&str]) -> Result<::csv::Writer<W>> {
    out.write_all(UTF8_BOM)?;
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    wtr.write_record(headers)?;
    Ok(wtr)
}

/// Writes the ranked summary (`med_key,cantidad`)
///
/// # Errors
///
/// Returns an error if writing to `out` fails
pub fn write_summary<W: Write>(out: W, ranked: &[RankedEntry]) -> Result<()> {
    let mut wtr = bom_writer(out, &SUMMARY_HEADERS)?;
    for entry in ranked {
        wtr.serialize(entry)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the per-item audit table
///
/// # Errors
///
/// Returns an error if writing to `out` fails
pub fn write_records<W: Write>(out: W, records: &[ItemRecord]) -> Result<()> {
    let mut wtr = bom_writer(out, &RECORD_HEADERS)?;
    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        MedTallyError::Output(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Writes the ranked summary to a file, replacing it if it exists
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_summary_file(path: impl AsRef<Path>, ranked: &[RankedEntry]) -> Result<()> {
    write_summary(create_file(path.as_ref())?, ranked)
}

/// Writes the audit table to a file, replacing it if it exists
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_records_file(path: impl AsRef<Path>, records: &[ItemRecord]) -> Result<()> {
    write_records(create_file(path.as_ref())?, records)
}

/// Writes both files under `config.directory`, creating it if needed
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written
pub fn write_outputs(config: &OutputConfig, output: &AggregateOutput) -> Result<OutputPaths> {
    let directory = Path::new(&config.directory);
    fs::create_dir_all(directory).map_err(|e| {
        MedTallyError::Output(format!(
            "Failed to create output directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let paths = OutputPaths {
        summary: directory.join(&config.summary_file),
        records: directory.join(&config.raw_file),
    };

    write_summary_file(&paths.summary, &output.ranked)?;
    write_records_file(&paths.records, &output.records)?;

    tracing::info!(
        summary = %paths.summary.display(),
        records = %paths.records.display(),
        keys = output.ranked.len(),
        items = output.records.len(),
        "Wrote CSV output"
    );

    Ok(paths)
}
