use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use lingo_config::translator::TranslatorConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::endpoint::resolve_endpoints;
use crate::error::TranslateError;
use crate::extract::extract_translation;
use crate::language::language_name;
use crate::prompt::build_prompt;
use crate::stream::LineDecoder;
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use crate::{TranslationRequest, Translator};

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";
const TEMPERATURE: f64 = 0.1;

/// One installed model as reported by `/api/tags`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub modified_at: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// Client for an Ollama-compatible inference server
#[derive(Clone)]
pub struct OllamaClient {
    transport: Arc<dyn HttpTransport>,
    probe_timeout: Duration,
}

impl OllamaClient {
    pub fn new(probe_timeout: Duration) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), probe_timeout)
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>, probe_timeout: Duration) -> Self {
        Self {
            transport,
            probe_timeout,
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(Duration::from_millis(config.probe_timeout_ms))
    }

    /// First candidate endpoint whose `/api/tags` answers successfully
    pub async fn check_connection(&self, base_url: &str) -> Result<String, TranslateError> {
        let mut last_error = None;

        for candidate in resolve_endpoints(base_url) {
            let url = format!("{candidate}{TAGS_PATH}");
            match self.transport.get(&url, self.probe_timeout).await {
                Ok(response) if response.is_success() => {
                    tracing::debug!("Inference server reachable at {candidate}");
                    return Ok(candidate);
                }
                Ok(response) => {
                    tracing::warn!("{url} answered with HTTP {}", response.status);
                    last_error = Some(TransportError::Other(format!(
                        "{url} answered with HTTP {}",
                        response.status
                    )));
                }
                Err(e) => {
                    tracing::warn!("Could not reach {url}: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(connection_failed(base_url, last_error))
    }

    /// Check if the inference server is available
    pub async fn is_available(&self, base_url: &str) -> bool {
        self.check_connection(base_url).await.is_ok()
    }

    /// Models installed on the server
    pub async fn list_models(&self, base_url: &str) -> Result<Vec<ModelInfo>, TranslateError> {
        let mut last_error = None;

        for candidate in resolve_endpoints(base_url) {
            let url = format!("{candidate}{TAGS_PATH}");
            match self.transport.get(&url, self.probe_timeout).await {
                Ok(response) => return read_models(response).await,
                Err(e) => {
                    tracing::warn!("Could not reach {url}: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(connection_failed(base_url, last_error))
    }

    /// POST to the first candidate that accepts a connection.
    ///
    /// Any HTTP response counts, including error statuses; only transport
    /// failures move on to the next candidate.
    async fn connect(
        &self,
        base_url: &str,
        body: &serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TranslateError> {
        let mut last_error = None;

        for candidate in resolve_endpoints(base_url) {
            let url = format!("{candidate}{GENERATE_PATH}");
            tracing::debug!("Connecting to {url}");

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranslateError::Cancelled),
                attempt = self.transport.post_json(&url, body) => attempt,
            };

            match attempt {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("Could not reach {url}: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(connection_failed(base_url, last_error))
    }
}

#[async_trait]
impl Translator for OllamaClient {
    async fn translate(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
        on_token: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, TranslateError> {
        let prompt = build_prompt(&request.text, &request.source_locale, &request.target_locale);
        let body = json!({
            "model": request.model,
            "prompt": prompt,
            "stream": true,
            "options": { "temperature": TEMPERATURE },
        });

        tracing::debug!(
            key = request.key.as_deref().unwrap_or_default(),
            model = %request.model,
            "Translating {} chars {} -> {}",
            request.text.len(),
            request.source_locale,
            request.target_locale
        );

        let response = self.connect(&request.base_url, &body, cancel).await?;

        if !response.is_success() {
            return Err(status_failure(response, &request.model).await);
        }

        let Some(mut stream) = response.body else {
            return Err(TranslateError::GenerationFailed(
                "Response has no readable body".to_string(),
            ));
        };

        let mut decoder = LineDecoder::new();
        let mut accumulated = String::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranslateError::Cancelled),
                next = stream.next() => next,
            };

            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(|e| {
                TranslateError::GenerationFailed(format!("Response stream interrupted: {e}"))
            })?;

            for fragment in decoder.push(&chunk) {
                accumulated.push_str(&fragment);
                on_token(&fragment);
            }
        }

        if let Some(fragment) = decoder.finish() {
            accumulated.push_str(&fragment);
            on_token(&fragment);
        }

        let translation =
            extract_translation(&accumulated, &language_name(&request.target_locale));

        tracing::info!(
            key = request.key.as_deref().unwrap_or_default(),
            "Translated {} chars into {} chars",
            request.text.len(),
            translation.len()
        );

        Ok(translation)
    }
}

fn connection_failed(base_url: &str, last_error: Option<TransportError>) -> TranslateError {
    let reason = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no endpoint to try".to_string());

    TranslateError::ConnectionFailed(format!(
        "Could not connect to inference server at {base_url}: {reason}"
    ))
}

async fn status_failure(response: HttpResponse, model: &str) -> TranslateError {
    let status = response.status;
    let body = response.text().await.unwrap_or_default();

    if status == 404 || body.contains("not found") {
        TranslateError::ModelNotFound(format!(
            "Model \"{model}\" is not available (HTTP {status}): {body}"
        ))
    } else {
        TranslateError::GenerationFailed(format!("HTTP {status}: {body}"))
    }
}

async fn read_models(response: HttpResponse) -> Result<Vec<ModelInfo>, TranslateError> {
    if !response.is_success() {
        let status = response.status;
        let body = response.text().await.unwrap_or_default();
        return Err(TranslateError::GenerationFailed(format!(
            "HTTP {status}: {body}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| TranslateError::GenerationFailed(format!("Failed to read model list: {e}")))?;

    let tags: TagsResponse = serde_json::from_str(&body)
        .map_err(|e| TranslateError::GenerationFailed(format!("Invalid model list: {e}")))?;

    Ok(tags.models)
}
