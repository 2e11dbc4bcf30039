//! JSON output types for the `--json` flag.

use serde::Serialize;
use std::fmt;

use commfx_effects::{ParamSnapshot, PassReport};

/// Error codes for CLI operations.
///
/// Effect errors pass through with their own `FX_XXX` codes.
pub mod error_codes {
    /// File could not be read or decoded
    pub const FILE_READ: &str = "CLI_001";
    /// File could not be written
    pub const FILE_WRITE: &str = "CLI_002";
    /// Chain description could not be parsed
    pub const CHAIN_PARSE: &str = "CLI_003";
    /// Neither a chain nor an effect was given
    pub const NO_EFFECTS: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g. "CLI_001", "FX_004")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Attaches the file the error refers to.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}] {} ({})", self.code, self.message, file),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for JsonError {}

/// Output of `commfx process --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Details of a successful `process` run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub input: String,
    pub output: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub samples: usize,
    pub seed: u32,
    pub passes: Vec<PassReport>,
}

impl ProcessOutput {
    pub fn success(result: ProcessResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }
}

/// Output of `commfx params --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ParamsOutput {
    pub effect: String,
    pub params: ParamSnapshot,
}

/// Output of `commfx compare --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CompareResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Metrics from comparing two recordings.
#[derive(Debug, Clone, Serialize)]
pub struct CompareResult {
    pub path_a: String,
    pub path_b: String,
    pub hash_a: String,
    pub hash_b: String,
    pub identical: bool,
    /// SNR of B against A in dB; `null` when the signals are identical.
    pub snr_db: Option<f64>,
    pub dominant_freq_a: f64,
    pub dominant_freq_b: f64,
    pub correlation: f64,
}

impl CompareOutput {
    pub fn success(result: CompareResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serialization() {
        let output = ProcessOutput::failure(vec![
            JsonError::new(error_codes::FILE_READ, "no such file").with_file("in.wav")
        ]);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["success"], false);
        assert!(json.get("result").is_none());
        assert_eq!(json["errors"][0]["code"], "CLI_001");
        assert_eq!(json["errors"][0]["file"], "in.wav");
    }

    #[test]
    fn test_error_without_file_omits_field() {
        let json = serde_json::to_value(JsonError::new("FX_004", "boom")).unwrap();
        assert!(json.get("file").is_none());
    }

    #[test]
    fn test_display_includes_code_and_file() {
        let err = JsonError::new(error_codes::FILE_WRITE, "disk full").with_file("out.wav");
        assert_eq!(err.to_string(), "[CLI_002] disk full (out.wav)");
    }
}
