// 📨 Export Response - what the CLI prints for one export request
// Config layering (file < environment < flags) and the JSON envelope

use crate::config::PipelineConfig;
use crate::criteria::HistoryQuotesCriteria;
use crate::pipeline::{ExportOutcome, HistoryQuotesPipeline};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::error;

/// Exit status of a successful export
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of a failed export
pub const EXIT_FAILURE: u8 = 1;

// ============================================================================
// REQUEST
// ============================================================================

/// ExportRequest - one export as asked for on the command line
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub criteria: HistoryQuotesCriteria,
    /// Source file, wins over config and environment
    pub input: Option<PathBuf>,
    /// Destination CSV, wins over config and environment
    pub output: Option<PathBuf>,
    /// JSON config file
    pub config: Option<PathBuf>,
}

impl ExportRequest {
    pub fn new(criteria: HistoryQuotesCriteria) -> Self {
        ExportRequest {
            criteria,
            input: None,
            output: None,
            config: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Defaults < config file < `lookup` (environment) < request flags
    pub fn resolve_config<F>(&self, lookup: F) -> Result<PipelineConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        }
        .apply_overrides(lookup);

        if let Some(input) = &self.input {
            config.input_file_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.filtered_file_path = output.clone();
        }
        Ok(config)
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Body of a successful export: the request echoed back plus what happened
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub request: HistoryQuotesCriteria,
    #[serde(flatten)]
    pub outcome: ExportOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseMessage {
    Export(ExportSummary),
    Error(String),
}

/// ApiResponse - `{success, message, errors, timestamp}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: ResponseMessage,
    pub errors: Vec<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn ok(summary: ExportSummary) -> Self {
        ApiResponse {
            success: true,
            message: ResponseMessage::Export(summary),
            errors: Vec::new(),
            timestamp: timestamp(),
        }
    }

    pub fn failure(message: String) -> Self {
        ApiResponse {
            success: false,
            errors: vec![message.clone()],
            message: ResponseMessage::Error(message),
            timestamp: timestamp(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.success {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Resolve the configuration and run the pipeline once
pub fn run_export<F>(request: ExportRequest, lookup: F) -> Result<ExportSummary>
where
    F: Fn(&str) -> Option<String>,
{
    let config = request.resolve_config(lookup)?;
    let mut criteria = request.criteria;

    let outcome = HistoryQuotesPipeline::new(config).run(&mut criteria)?;

    Ok(ExportSummary {
        request: criteria,
        outcome,
    })
}

/// Run one export and wrap the result, never failing itself
pub fn respond<F>(request: ExportRequest, lookup: F) -> ApiResponse
where
    F: Fn(&str) -> Option<String>,
{
    match run_export(request, lookup) {
        Ok(summary) => ApiResponse::ok(summary),
        Err(err) => {
            error!("Export failed: {:#}", err);
            ApiResponse::failure(err.to_string())
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_INPUT, ENV_OUTPUT};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const QUOTES: &str = r#"[
{"symbol": "AAPL", "company_name": "Apple Inc.", "start_date": "2023-07-28", "end_date": "2023-07-28", "close": 195.83},
{"symbol": "MSFT", "company_name": "Microsoft", "start_date": "2023-07-28", "end_date": "2023-07-28", "close": 338.37}
]"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn request() -> ExportRequest {
        ExportRequest::new(
            HistoryQuotesCriteria::new("AAPL", "2023-07-01", "2023-07-31").with_email("a@b.com"),
        )
    }

    fn write_quotes(dir: &Path) -> PathBuf {
        let path = dir.join("quotes.json");
        fs::write(&path, QUOTES).unwrap();
        path
    }

    #[test]
    fn test_success_envelope() {
        let dir = TempDir::new().unwrap();
        let input = write_quotes(dir.path());
        let output = dir.path().join("out/quotes.csv");

        let response = respond(request().with_input(&input).with_output(&output), no_env);

        assert!(response.success);
        assert!(response.errors.is_empty());
        assert_eq!(response.exit_code(), 0);

        let json: Value = serde_json::from_str(&response.to_json(false).unwrap()).unwrap();
        assert_eq!(json["success"], Value::Bool(true));
        assert_eq!(json["errors"], Value::Array(Vec::new()));
        assert!(json["timestamp"].is_string());
        assert_eq!(json["message"]["request"]["symbol"], "AAPL");
        assert_eq!(json["message"]["request"]["email"], "a@b.com");
        assert_eq!(json["message"]["company_name"], "Apple Inc.");
        assert_eq!(json["message"]["export"]["rows_written"], 1);

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "start_date,end_date,close\n2023-07-28,2023-07-28,195.83\n"
        );
    }

    #[test]
    fn test_missing_input_is_failure_envelope() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");

        let response = respond(
            request()
                .with_input(&missing)
                .with_output(dir.path().join("out.csv")),
            no_env,
        );

        assert!(!response.success);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.exit_code(), 1);
        assert!(response.errors[0].contains("File not found"));

        let json: Value = serde_json::from_str(&response.to_json(true).unwrap()).unwrap();
        assert_eq!(json["success"], Value::Bool(false));
        assert_eq!(json["message"], json["errors"][0]);
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_unreadable_config_is_failure_envelope() {
        let dir = TempDir::new().unwrap();

        let response = respond(request().with_config(dir.path().join("missing.json")), no_env);

        assert!(!response.success);
        assert_eq!(response.exit_code(), 1);
        assert!(response.errors[0].contains("Failed to read config file"));
    }

    #[test]
    fn test_flags_override_env_and_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"input_file_path": "from-config.json", "filtered_file_path": "from-config.csv"}"#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [(ENV_INPUT, "from-env.json"), (ENV_OUTPUT, "from-env.csv")]
            .into_iter()
            .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let from_env = request()
            .with_config(&config_path)
            .resolve_config(&lookup)
            .unwrap();
        assert_eq!(from_env.input_file_path, PathBuf::from("from-env.json"));
        assert_eq!(from_env.filtered_file_path, PathBuf::from("from-env.csv"));

        let from_flags = request()
            .with_config(&config_path)
            .with_input("from-flag.json")
            .with_output("from-flag.csv")
            .resolve_config(&lookup)
            .unwrap();
        assert_eq!(from_flags.input_file_path, PathBuf::from("from-flag.json"));
        assert_eq!(from_flags.filtered_file_path, PathBuf::from("from-flag.csv"));
    }

    #[test]
    fn test_config_file_used_without_env_or_flags() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"input_file_path": "from-config.json"}"#).unwrap();

        let config = request().with_config(&config_path).resolve_config(no_env).unwrap();

        assert_eq!(config.input_file_path, PathBuf::from("from-config.json"));
        assert_eq!(
            config.filtered_file_path,
            PipelineConfig::default().filtered_file_path
        );
    }
}
