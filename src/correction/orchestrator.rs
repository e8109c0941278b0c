//! Two-attempt correction policy
//!
//! The first attempt uses the standard prompt. Any failure, including a
//! decoded correction without a command, triggers exactly one retry with the
//! stricter prompt. There is no third attempt.

use super::client::Generate;
use super::error::{AttemptError, CorrectionError};
use super::models::{Correction, CorrectionRequest};
use super::parse::parse_correction;
use super::prompts::{build_prompt, build_retry_prompt};
use crate::util::format_duration;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttemptKind {
    Standard,
    Retry,
}

impl AttemptKind {
    fn label(&self) -> &'static str {
        match self {
            AttemptKind::Standard => "First",
            AttemptKind::Retry => "Second",
        }
    }

    fn prompt(&self, request: &CorrectionRequest) -> String {
        match self {
            AttemptKind::Standard => build_prompt(request),
            AttemptKind::Retry => build_retry_prompt(request),
        }
    }
}

/// Ask the model for a correction of a failed command.
///
/// With `verbose` set, token count, generation time, and raw text of each
/// attempt are printed to stderr.
pub async fn get_correction<G: Generate>(
    generator: &G,
    request: &CorrectionRequest,
    verbose: bool,
) -> Result<Correction, CorrectionError> {
    let mut stderr = io::stderr();
    get_correction_with(generator, request, verbose.then_some(&mut stderr)).await
}

/// Same as [`get_correction`], writing per-attempt diagnostics to
/// `diagnostics` when one is given. Nothing is reported otherwise.
pub async fn get_correction_with<G: Generate, W: Write>(
    generator: &G,
    request: &CorrectionRequest,
    mut diagnostics: Option<&mut W>,
) -> Result<Correction, CorrectionError> {
    let mut last = None;

    for kind in [AttemptKind::Standard, AttemptKind::Retry] {
        match attempt(generator, request, kind, diagnostics.as_deref_mut()).await {
            Ok(correction) => {
                tracing::debug!(attempt = kind.label(), "model returned a usable correction");
                return Ok(correction);
            }
            Err(err) => {
                tracing::debug!(
                    attempt = kind.label(),
                    transport = err.is_transport(),
                    error = %err,
                    "correction attempt failed"
                );
                if let Some(out) = diagnostics.as_deref_mut() {
                    let _ = writeln!(out, "{} attempt failed with error: {}", kind.label(), err);
                }
                last = Some(err);
            }
        }
    }

    Err(CorrectionError::TerminalFailure { last })
}

async fn attempt<G: Generate, W: Write>(
    generator: &G,
    request: &CorrectionRequest,
    kind: AttemptKind,
    diagnostics: Option<&mut W>,
) -> Result<Correction, AttemptError> {
    let prompt = kind.prompt(request);
    let generation = generator.generate(&prompt).await?;

    tracing::debug!(
        attempt = kind.label(),
        tokens = generation.usage.eval_count,
        eval_ms = generation.usage.eval_duration.as_millis() as u64,
        "generation finished"
    );
    if let Some(out) = diagnostics {
        let _ = write!(
            out,
            "\nTokens Used: {}\nTotal Time: {}\nRaw Ollama Response: {}\n",
            generation.usage.eval_count,
            format_duration(generation.usage.eval_duration),
            generation.text
        );
    }

    let correction = parse_correction(&generation.text)?;
    if !correction.has_command() {
        return Err(AttemptError::EmptyCorrection);
    }
    Ok(correction)
}
