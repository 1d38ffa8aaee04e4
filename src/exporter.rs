// 📤 Tabular Exporter
// Streams records into a CSV file, one row per record, nothing buffered beyond a row

use crate::error::{PipelineError, Result};
use crate::record::{render_cell, strip_reserved, Record};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Data rows, header excluded
    pub rows_written: usize,
    pub header_written: bool,
}

/// CsvExporter - writes a record stream as delimited text
///
/// Reserved fields (`symbol`, `company_name`) are dropped from every record
/// before it is written. Without explicit headers, the first record's
/// remaining field names become the header row.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        CsvExporter { delimiter: b',' }
    }

    /// Builder pattern: use another field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Export `source` to `destination` and hand the path back
    pub fn export<I>(&self, source: I, destination: &Path, headers: &[String]) -> Result<PathBuf>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        self.export_with_report(source, destination, headers)
            .map(|report| report.path)
    }

    /// Same as [`CsvExporter::export`], with row counts
    ///
    /// Parent directories are created first and any existing file is truncated.
    /// An error from `source` stops the export and is returned unchanged; rows
    /// already written stay in the file.
    pub fn export_with_report<I>(
        &self,
        source: I,
        destination: &Path,
        headers: &[String],
    ) -> Result<ExportReport>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        ensure_parent_dir(destination)?;

        let file = File::create(destination).map_err(|source| PipelineError::CreateFile {
            path: destination.to_path_buf(),
            source,
        })?;

        // Records don't have to share a shape, so rows may differ in length
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(file);

        let write_err = |source: csv::Error| PipelineError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let mut header_written = false;
        if !headers.is_empty() {
            writer.write_record(headers).map_err(write_err)?;
            header_written = true;
        }

        let mut rows_written = 0;
        for item in source {
            let mut record = item?;
            strip_reserved(&mut record);

            if rows_written == 0 && headers.is_empty() {
                write_row(&mut writer, record.keys().cloned().collect()).map_err(write_err)?;
                header_written = true;
            }

            write_row(&mut writer, record.values().map(render_cell).collect())
                .map_err(write_err)?;
            rows_written += 1;
        }

        writer
            .flush()
            .map_err(|err| write_err(csv::Error::from(err)))?;
        drop(writer);

        info!(
            path = %destination.display(),
            rows = rows_written,
            "Export finished"
        );

        Ok(ExportReport {
            path: destination.to_path_buf(),
            rows_written,
            header_written,
        })
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write one row; a row without columns becomes a bare line ending
fn write_row(writer: &mut csv::Writer<File>, fields: Vec<String>) -> csv::Result<()> {
    if !fields.is_empty() {
        return writer.write_record(&fields);
    }

    // csv writes an empty record as `""`, which reads back as one empty column
    writer.flush()?;
    let mut file: &File = writer.get_ref();
    file.write_all(b"\n")?;
    Ok(())
}

fn ensure_parent_dir(destination: &Path) -> Result<()> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            fs::create_dir_all(parent).map_err(|source| PipelineError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
