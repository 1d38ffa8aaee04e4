// ⚠️ Pipeline Errors
// Everything the read → filter → export pipeline can surface to its caller.
// Malformed lines are not here: the reader recovers from them internally.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    // ------------------------------------------------------------------------
    // Read side (file access)
    // ------------------------------------------------------------------------
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Cannot open file: {}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line} of {}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    // ------------------------------------------------------------------------
    // Export side
    // ------------------------------------------------------------------------
    #[error("Cannot create directory: {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create file: {}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // ------------------------------------------------------------------------
    // Notice composition
    // ------------------------------------------------------------------------
    #[error("Attachment file not found: {}", path.display())]
    AttachmentMissing { path: PathBuf },
}

impl PipelineError {
    /// True for the errors raised while producing the export file
    pub fn is_export_error(&self) -> bool {
        matches!(
            self,
            PipelineError::CreateDirectory { .. }
                | PipelineError::CreateFile { .. }
                | PipelineError::Write { .. }
        )
    }

    /// True for the errors raised while opening or reading the source file
    pub fn is_file_access_error(&self) -> bool {
        matches!(
            self,
            PipelineError::FileNotFound { .. }
                | PipelineError::FileAccess { .. }
                | PipelineError::Read { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message_contains_path() {
        let err = PipelineError::FileNotFound {
            path: PathBuf::from("/path/to/nonexistent/file.json"),
        };
        assert_eq!(err.to_string(), "File not found: /path/to/nonexistent/file.json");
        assert!(err.is_file_access_error());
        assert!(!err.is_export_error());
    }

    #[test]
    fn test_export_classification() {
        let err = PipelineError::CreateFile {
            path: PathBuf::from("/readonly/out.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_export_error());
        assert_eq!(err.to_string(), "Cannot create file: /readonly/out.csv");
    }
}
