//! Error types for talking to the inference server

use thiserror::Error;

/// Provider construction failed; nothing usable was produced
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The configured base URL could not be parsed
    #[error("invalid Ollama base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Ollama base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    /// The liveness probe did not get a successful answer
    #[error("Ollama server is not running at {url}: {reason}")]
    Unreachable { url: String, reason: String },
}

/// Why a single attempt did not yield a correction.
///
/// Every variant sends the orchestrator down the retry path.
#[derive(Error, Debug)]
pub enum AttemptError {
    /// Transport failure, bad status, or an undecodable generate response
    #[error("Ollama API error: {0}")]
    Provider(String),

    /// An HTML page came back instead of a model response
    #[error("received an HTML response instead of JSON; check for captive portals or network proxy issues")]
    ProxyInterference,

    #[error("empty response from Ollama")]
    EmptyResponse,

    #[error("no valid JSON found in the response from Ollama")]
    NoJsonFound,

    #[error("failed to unmarshal JSON from Ollama response: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Decoded fine, but the model offered no command
    #[error("the model returned an empty corrected command")]
    EmptyCorrection,
}

impl AttemptError {
    /// True when the request never produced genuine model text
    pub fn is_transport(&self) -> bool {
        matches!(self, AttemptError::Provider(_) | AttemptError::ProxyInterference)
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        AttemptError::Provider(err.to_string())
    }
}

/// Final outcome surfaced to the caller when no correction could be obtained
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("the language model did not return a valid correction after two attempts")]
    TerminalFailure {
        /// What went wrong on the last attempt, for diagnostics only
        last: Option<AttemptError>,
    },
}
