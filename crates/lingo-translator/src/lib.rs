use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub mod batch;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod language;
pub mod prompt;
pub mod stream;
pub mod transport;

#[cfg(test)]
mod tests;

pub use batch::{BatchEntry, BatchProgress, BatchRequest, BatchResult, translate_batch};
pub use client::{ModelInfo, OllamaClient};
pub use error::{ErrorKind, TranslateError};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

/// One string to translate.
///
/// `key` and `comment` come from the catalog entry and are only carried for
/// correlation; they are never sent to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_locale: String,
    pub target_locale: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `request.text`, passing each generated fragment to `on_token`
    /// as it arrives.
    ///
    /// Returns [`TranslateError::Cancelled`] once `cancel` fires.
    async fn translate(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
        on_token: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, TranslateError>;
}
