// 🔗 History Quotes Pipeline
// read → filter → export, pulled one record at a time by the exporter

use crate::config::PipelineConfig;
use crate::criteria::HistoryQuotesCriteria;
use crate::error::Result;
use crate::exporter::{CsvExporter, ExportReport};
use crate::filter::filter;
use crate::notice::ReportNotice;
use crate::reader::{FileReader, JsonLinesReader};
use serde::Serialize;
use tracing::info;

/// Everything the calling layer needs after a run
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub export: ExportReport,
    /// Records the criteria were evaluated against
    pub records_evaluated: usize,
    pub company_name: Option<String>,
    pub notice: ReportNotice,
}

/// HistoryQuotesPipeline - wires a reader, the filter and the exporter together
pub struct HistoryQuotesPipeline<R = JsonLinesReader> {
    reader: R,
    exporter: CsvExporter,
    config: PipelineConfig,
}

impl HistoryQuotesPipeline<JsonLinesReader> {
    pub fn new(config: PipelineConfig) -> Self {
        HistoryQuotesPipeline::with_reader(JsonLinesReader::new(), config)
    }
}

impl<R: FileReader> HistoryQuotesPipeline<R> {
    /// Use another record source
    pub fn with_reader(reader: R, config: PipelineConfig) -> Self {
        HistoryQuotesPipeline {
            reader,
            exporter: CsvExporter::new(),
            config,
        }
    }

    /// Builder pattern: swap the exporter (e.g. another delimiter)
    pub fn with_exporter(mut self, exporter: CsvExporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one export for `criteria`
    ///
    /// The criteria must belong to this run alone: its company-name slot is
    /// filled while records stream through and read back for the notice.
    pub fn run(&self, criteria: &mut HistoryQuotesCriteria) -> Result<ExportOutcome> {
        info!(
            symbol = %criteria.symbol,
            start_date = %criteria.start_date,
            end_date = %criteria.end_date,
            "Starting history quotes export"
        );

        let records = self.reader.read(&self.config.input_file_path)?;

        let (export, records_evaluated) = {
            let mut filtered = filter(records, criteria);
            let export = self.exporter.export_with_report(
                &mut filtered,
                &self.config.filtered_file_path,
                &self.config.headers,
            )?;
            (export, filtered.evaluated())
        };

        let notice = ReportNotice::compose(criteria, &self.config.notice, &export.path)?;

        info!(
            evaluated = records_evaluated,
            exported = export.rows_written,
            path = %export.path.display(),
            "History quotes export complete"
        );

        Ok(ExportOutcome {
            export,
            records_evaluated,
            company_name: criteria.company_name().map(str::to_string),
            notice,
        })
    }
}
