use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::TranslateError;
use crate::{TranslationRequest, Translator};

/// One catalog string scheduled for translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub key: String,
    pub source_text: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub key: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entries sharing one locale pair, server and model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub entries: Vec<BatchEntry>,
    pub source_locale: String,
    pub target_locale: String,
    pub base_url: String,
    pub model: String,
}

/// Reported after every entry, failed ones included (with an empty translation)
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub key: String,
    pub translation: String,
}

/// Translate every entry in order, one request at a time.
///
/// A failed entry is recorded in its [`BatchResult`] and the batch moves on.
/// Cancellation aborts the whole batch with [`TranslateError::Cancelled`] and
/// discards the results gathered so far.
pub async fn translate_batch<T, P, K>(
    translator: &T,
    request: &BatchRequest,
    cancel: &CancellationToken,
    mut on_progress: P,
    mut on_token: K,
) -> Result<Vec<BatchResult>, TranslateError>
where
    T: Translator + ?Sized,
    P: FnMut(BatchProgress) + Send,
    K: FnMut(&str, &str) + Send,
{
    let total = request.entries.len();
    let mut results = Vec::with_capacity(total);

    for (index, entry) in request.entries.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!("Batch cancelled after {index} of {total} entries");
            return Err(TranslateError::Cancelled);
        }

        let single = TranslationRequest {
            text: entry.source_text.clone(),
            source_locale: request.source_locale.clone(),
            target_locale: request.target_locale.clone(),
            key: Some(entry.key.clone()),
            comment: entry.comment.clone(),
            base_url: request.base_url.clone(),
            model: request.model.clone(),
        };

        let mut forward = |token: &str| on_token(&entry.key, token);
        let outcome = translator.translate(&single, cancel, &mut forward).await;

        let result = match outcome {
            Ok(translation) => BatchResult {
                key: entry.key.clone(),
                translation,
                error: None,
            },
            Err(TranslateError::Cancelled) => {
                tracing::info!("Batch cancelled while translating {}", entry.key);
                return Err(TranslateError::Cancelled);
            }
            Err(e) => {
                tracing::warn!("Failed to translate {}: {e}", entry.key);
                BatchResult {
                    key: entry.key.clone(),
                    translation: String::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        on_progress(BatchProgress {
            completed: index + 1,
            total,
            key: result.key.clone(),
            translation: result.translation.clone(),
        });
        results.push(result);
    }

    Ok(results)
}
