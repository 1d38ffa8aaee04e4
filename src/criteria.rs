// 🎯 History Quotes Criteria
// Symbol + inclusive date range, with the matched company name captured on the side

use crate::filter::FilterCondition;
use crate::record::{
    render_cell, str_field, Record, COMPANY_NAME_FIELD, END_DATE_FIELD, START_DATE_FIELD,
    SYMBOL_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HistoryQuotesCriteria - what one export request asks for
///
/// Built once per request, evaluated against every candidate record, then read
/// back by whoever composes the report notice. One instance per pipeline run:
/// the company-name slot is overwritten by every successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuotesCriteria {
    /// Ticker, compared ASCII case-insensitively
    pub symbol: String,

    /// Inclusive lower bound, `YYYY-MM-DD`
    pub start_date: String,

    /// Inclusive upper bound, `YYYY-MM-DD`
    pub end_date: String,

    /// Report recipient (not a filter input)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Company name of the last matched record, `None` until something matches
    #[serde(skip)]
    company_name: Option<String>,
}

impl HistoryQuotesCriteria {
    pub fn new(
        symbol: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        HistoryQuotesCriteria {
            symbol: symbol.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            email: None,
            company_name: None,
        }
    }

    /// Builder pattern: add the report recipient
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Company name captured by the most recent successful match
    ///
    /// Last match wins: every accepted record overwrites the previous value.
    /// Records without a `company_name` leave an empty string behind.
    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// `From <start> to <end>`
    pub fn date_range_label(&self) -> String {
        format!("From {} to {}", self.start_date, self.end_date)
    }

    /// Evaluate one record; captures the company name on success
    pub fn matches(&mut self, record: &Record) -> bool {
        let matched = self.matches_symbol(record) && self.matches_date_range(record);
        if matched {
            self.company_name = Some(company_name_of(record));
        }
        matched
    }

    // Numeric symbols (digit-only tickers) compare by their decimal text
    fn matches_symbol(&self, record: &Record) -> bool {
        match record.get(SYMBOL_FIELD) {
            Some(Value::String(symbol)) => symbol.eq_ignore_ascii_case(&self.symbol),
            Some(Value::Number(symbol)) => symbol.to_string().eq_ignore_ascii_case(&self.symbol),
            _ => false,
        }
    }

    // Containment of the record's own interval: fixed-width dates compare
    // correctly as plain strings.
    fn matches_date_range(&self, record: &Record) -> bool {
        match (
            str_field(record, START_DATE_FIELD),
            str_field(record, END_DATE_FIELD),
        ) {
            (Some(start), Some(end)) => {
                start >= self.start_date.as_str() && end <= self.end_date.as_str()
            }
            _ => false,
        }
    }
}

impl FilterCondition for HistoryQuotesCriteria {
    fn matches(&mut self, record: &Record) -> bool {
        HistoryQuotesCriteria::matches(self, record)
    }
}

fn company_name_of(record: &Record) -> String {
    match record.get(COMPANY_NAME_FIELD) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => render_cell(other),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
