//! HTTP client for an Ollama-compatible inference server
//!
//! Construction probes the server with `HEAD /`, so a client value always
//! points at a server that answered at least once.

use super::error::{AttemptError, ConnectionError};
use super::models::{Generation, Usage};
use crate::config::Config;
use crate::util::truncate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use url::Url;

const GENERATE_PATH: &str = "/api/generate";

/// Anything that can turn a prompt into raw model text
pub trait Generate {
    fn generate(&self, prompt: &str)
        -> impl Future<Output = Result<Generation, AttemptError>> + Send;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: u64,
    /// Nanoseconds
    #[serde(default)]
    eval_duration: u64,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Live handle to the inference server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: Url,
    model: String,
}

impl OllamaClient {
    /// Parse the configured URL and run the liveness probe.
    pub async fn connect(config: &Config) -> Result<Self, ConnectionError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConnectionError::Unreachable {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        let client = Self {
            http,
            base_url,
            model: config.model.clone(),
        };
        client.heartbeat().await?;

        tracing::info!(url = %client.base_url, model = %client.model, "connected to Ollama");
        Ok(client)
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn heartbeat(&self) -> Result<(), ConnectionError> {
        let url = self.endpoint("/");
        tracing::debug!(%url, "probing inference server");

        let probe_failed = |reason: String| ConnectionError::Unreachable {
            url: self.base_url.to_string(),
            reason,
        };

        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|e| probe_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(probe_failed(format!("liveness probe returned {}", status)));
        }
        Ok(())
    }

    /// Build an absolute URL for `path`, keeping any prefix in the base URL
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base, path));
        url
    }

    async fn generate_inner(&self, prompt: &str) -> Result<Generation, AttemptError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        let response = self
            .http
            .post(self.endpoint(GENERATE_PATH))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if looks_like_html(&body) {
            tracing::debug!(%status, "generate endpoint answered with an HTML page");
            return Err(AttemptError::ProxyInterference);
        }

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorPayload>(&body)
                .map(|payload| payload.error)
                .unwrap_or_else(|_| truncate(body.trim(), 200));
            return Err(AttemptError::Provider(format!("status {}: {}", status, detail)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            AttemptError::Provider(format!(
                "failed to decode generate response: {} ({})",
                e,
                truncate(body.trim(), 200)
            ))
        })?;

        if looks_like_html(&parsed.response) {
            tracing::debug!("model response is an HTML page");
            return Err(AttemptError::ProxyInterference);
        }
        if !parsed.done {
            tracing::debug!("generate response not marked done; output may be cut short");
        }

        Ok(Generation {
            text: parsed.response,
            usage: Usage {
                eval_count: parsed.eval_count,
                eval_duration: Duration::from_nanos(parsed.eval_duration),
            },
        })
    }
}

impl Generate for OllamaClient {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<Generation, AttemptError>> + Send {
        self.generate_inner(prompt)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConnectionError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConnectionError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConnectionError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

/// Captive portals and intercepting proxies answer with a web page.
/// Only the document declaration counts; a bare `<html>` reply is left to
/// the JSON extractor.
pub(crate) fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(14).collect();
    head.eq_ignore_ascii_case("<!doctype html")
}
