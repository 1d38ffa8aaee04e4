// History Quotes - Core Library
// Streams a line-oriented JSON quotes file through a filter into a CSV export

pub mod record;
pub mod error;
pub mod reader;     // LineRecordReader: file → lazy records
pub mod filter;     // RecordFilter: lazy records → matching records
pub mod criteria;   // Symbol + date range predicate
pub mod exporter;   // TabularExporter: records → CSV
pub mod notice;     // Report notice composition
pub mod config;
pub mod pipeline;
pub mod response;   // CLI request → JSON envelope

// Re-export commonly used types
pub use record::{render_cell, strip_reserved, Record, RESERVED_FIELDS};
pub use error::{PipelineError, Result};
pub use reader::{open_and_stream, FileReader, JsonLinesReader, RecordStream};
pub use filter::{filter, FilterCondition, Filtered};
pub use criteria::HistoryQuotesCriteria;
pub use exporter::{CsvExporter, ExportReport};
pub use notice::ReportNotice;
pub use config::{NoticeConfig, PipelineConfig};
pub use pipeline::{ExportOutcome, HistoryQuotesPipeline};
pub use response::{respond, run_export, ApiResponse, ExportRequest, ExportSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
