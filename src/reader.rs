// 📥 Line Record Reader
// Streams JSON objects out of a file shaped like a JSON array, one line at a time.
//
// The file is never parsed as a whole document: every physical line is looked
// at on its own, bracket/comma noise is peeled off, and whatever is left is
// decoded when it looks like an object. Broken lines are dropped, the rest of
// the file keeps flowing.

use crate::error::{PipelineError, Result};
use crate::record::Record;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// READER TRAIT
// ============================================================================

/// FileReader - turns a path into a lazy sequence of records
///
/// Opening is eager (missing or unreadable files fail here, before any record
/// is produced); decoding is lazy and happens as the caller pulls.
pub trait FileReader {
    type Records: Iterator<Item = Result<Record>>;

    /// Open `path` and return a fresh, single-pass record sequence
    fn read(&self, path: &Path) -> Result<Self::Records>;
}

/// Reader for "one JSON object per line" array files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesReader;

impl JsonLinesReader {
    pub fn new() -> Self {
        JsonLinesReader
    }
}

impl FileReader for JsonLinesReader {
    type Records = RecordStream<BufReader<File>>;

    fn read(&self, path: &Path) -> Result<Self::Records> {
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PipelineError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => PipelineError::FileAccess {
                path: path.to_path_buf(),
                source,
            },
        })?;

        // Opening a directory succeeds on Unix; check the handle we actually hold
        let is_dir = file
            .metadata()
            .map_err(|source| PipelineError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?
            .is_dir();
        if is_dir {
            return Err(PipelineError::FileAccess {
                path: path.to_path_buf(),
                source: io::Error::other("path is a directory"),
            });
        }

        info!(path = %path.display(), "Reading records");
        Ok(RecordStream::new(BufReader::new(file), path))
    }
}

/// Open `path` with the default [`JsonLinesReader`]
pub fn open_and_stream<P: AsRef<Path>>(path: P) -> Result<RecordStream<BufReader<File>>> {
    JsonLinesReader::new().read(path.as_ref())
}

// ============================================================================
// RECORD STREAM
// ============================================================================

/// RecordStream - lazy, pull-based sequence of decoded records
///
/// Holds one line buffer at a time. The underlying reader is dropped as soon
/// as the stream is exhausted or fails, and otherwise when the stream itself
/// is dropped, so abandoning iteration early still closes the file.
pub struct RecordStream<R> {
    reader: Option<R>,
    path: PathBuf,
    line: Vec<u8>,
    line_number: usize,
    records_read: usize,
    lines_skipped: usize,
}

impl<R: BufRead> RecordStream<R> {
    /// Wrap any buffered source; `path` is only used in logs and errors
    pub fn new<P: Into<PathBuf>>(reader: R, path: P) -> Self {
        RecordStream {
            reader: Some(reader),
            path: path.into(),
            line: Vec::new(),
            line_number: 0,
            records_read: 0,
            lines_skipped: 0,
        }
    }

    /// Records produced so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Object-looking lines that failed to decode and were dropped
    pub fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }

    /// Physical lines consumed so far
    pub fn lines_consumed(&self) -> usize {
        self.line_number
    }

    /// False once the source has been released
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            info!(
                path = %self.path.display(),
                records = self.records_read,
                skipped = self.lines_skipped,
                "Finished reading records"
            );
        }
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            self.line.clear();

            match reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.close();
                    return None;
                }
                Ok(_) => {
                    self.line_number += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    let line = self.line_number + 1;
                    self.close();
                    return Some(Err(PipelineError::Read {
                        path: self.path.clone(),
                        line,
                        source,
                    }));
                }
            }

            match decode_line(&self.line) {
                LineOutcome::Record(record) => {
                    self.records_read += 1;
                    return Some(Ok(record));
                }
                LineOutcome::Noise => {}
                LineOutcome::Malformed(reason) => {
                    self.lines_skipped += 1;
                    debug!(
                        path = %self.path.display(),
                        line = self.line_number,
                        %reason,
                        "Skipping malformed record"
                    );
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordStream<R> {}

// ============================================================================
// LINE DECODING
// ============================================================================

/// What a single physical line turned out to be
enum LineOutcome {
    Record(Record),
    /// Blank lines, lone brackets, anything not starting with `{`
    Noise,
    /// Looked like an object but did not decode; recovered locally
    Malformed(MalformedRecord),
}

#[derive(Debug, thiserror::Error)]
enum MalformedRecord {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

fn decode_line(raw: &[u8]) -> LineOutcome {
    let text = String::from_utf8_lossy(raw);

    let Some(candidate) = object_candidate(&text) else {
        return LineOutcome::Noise;
    };

    // Lossy decoding only allocates when it had to replace bytes
    if matches!(text, Cow::Owned(_)) {
        return LineOutcome::Malformed(MalformedRecord::InvalidUtf8);
    }

    match serde_json::from_str::<Record>(candidate) {
        Ok(record) => LineOutcome::Record(record),
        Err(err) => LineOutcome::Malformed(err.into()),
    }
}

/// Peel array noise off a line and return it if what's left starts with `{`
///
/// Strips one trailing comma, then one leading `[` and one trailing `]`.
fn object_candidate(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "[" || trimmed == "]" {
        return None;
    }

    let stripped = trimmed.strip_suffix(',').unwrap_or(trimmed);
    let stripped = stripped.strip_prefix('[').unwrap_or(stripped);
    let stripped = stripped.strip_suffix(']').unwrap_or(stripped);
    let stripped = stripped.trim();

    if stripped.starts_with('{') {
        Some(stripped)
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
