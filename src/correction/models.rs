use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The failed command as captured by the shell wrapper
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorrectionRequest {
    pub command: String,
    #[serde(default)]
    pub output: String,
    pub exit_code: i32,
}

impl CorrectionRequest {
    pub fn new(command: impl Into<String>, output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            exit_code,
        }
    }
}

/// Structured answer extracted from a model reply.
///
/// An empty `corrected_command` means the model had no actionable fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Correction {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub corrected_command: String,
}

impl Correction {
    pub fn has_command(&self) -> bool {
        !self.corrected_command.trim().is_empty()
    }
}

/// Generation stats reported by the inference server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    /// Tokens produced for the response
    pub eval_count: u64,
    /// Time spent generating those tokens
    pub eval_duration: Duration,
}

/// Raw model text plus the stats that came with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_shell_payload() {
        let json = r#"{"command": "gti status", "output": "gti: command not found", "exit_code": 127}"#;
        let request: CorrectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request, CorrectionRequest::new("gti status", "gti: command not found", 127));
    }

    #[test]
    fn test_request_output_defaults_to_empty() {
        let json = r#"{"command": "false", "exit_code": 1}"#;
        let request: CorrectionRequest = serde_json::from_str(json).unwrap();
        assert!(request.output.is_empty());
    }

    #[test]
    fn test_correction_missing_keys_default_to_empty() {
        let correction: Correction = serde_json::from_str(r#"{"explanation": "no idea"}"#).unwrap();
        assert_eq!(correction.explanation, "no idea");
        assert!(!correction.has_command());
    }

    #[test]
    fn test_whitespace_command_is_not_actionable() {
        let correction = Correction {
            explanation: String::new(),
            corrected_command: "   ".to_string(),
        };
        assert!(!correction.has_command());
    }
}
