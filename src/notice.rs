// ✉️ Report Notice
// Composes the message that announces an export. Sending it is someone else's job.

use crate::config::NoticeConfig;
use crate::criteria::HistoryQuotesCriteria;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportNotice {
    pub from: String,
    pub to: String,
    /// Company name captured during filtering, empty when nothing matched
    pub subject: String,
    pub body: String,
    pub attachment_path: PathBuf,
    pub attachment_name: String,
    pub content_type: String,
}

impl ReportNotice {
    /// Build the notice for a finished export
    ///
    /// Must be called after the filtered stream is fully consumed, otherwise
    /// the captured company name may not be final.
    pub fn compose(
        criteria: &HistoryQuotesCriteria,
        config: &NoticeConfig,
        attachment: &Path,
    ) -> Result<Self> {
        if !attachment.is_file() {
            return Err(PipelineError::AttachmentMissing {
                path: attachment.to_path_buf(),
            });
        }

        let attachment_name = if config.attachment_name.trim().is_empty() {
            attachment
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            config.attachment_name.clone()
        };

        Ok(ReportNotice {
            from: config.from.clone(),
            to: criteria.email.clone().unwrap_or_default(),
            subject: criteria.company_name().unwrap_or_default().to_string(),
            body: criteria.date_range_label(),
            attachment_path: attachment.to_path_buf(),
            attachment_name,
            content_type: CSV_CONTENT_TYPE.to_string(),
        })
    }
}
