//! Correction retrieval: prompt, generate, extract, validate.

pub mod client;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod parse;
pub mod prompts;

pub use client::{Generate, OllamaClient};
pub use error::{AttemptError, ConnectionError, CorrectionError};
pub use models::{Correction, CorrectionRequest, Generation, Usage};
pub use orchestrator::{get_correction, get_correction_with};
pub use parse::{extract_json_object, parse_correction};
pub use prompts::{build_prompt, build_retry_prompt};
