use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use lingo_translator::{BatchEntry, BatchRequest, translate_batch};
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;
use crate::state::AppState;

/// Parse a JSON array of batch entries
pub fn load_entries(data: &str) -> anyhow::Result<Vec<BatchEntry>> {
    serde_json::from_str(data).context("Batch input must be a JSON array of {key, source_text}")
}

pub async fn handle_batch(
    state: Arc<AppState>,
    input: &Path,
    output: Option<&Path>,
    cancel: &CancellationToken,
    event_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let data = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let entries = load_entries(&data)?;

    let request = {
        let config = &state.config.translator;
        BatchRequest {
            entries,
            source_locale: config.from_lang.clone(),
            target_locale: config.to_lang.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    };

    tracing::info!(
        "Translating {} entries {} -> {} with {}",
        request.entries.len(),
        request.source_locale,
        request.target_locale,
        request.model
    );

    let progress_tx = event_tx.clone();
    let token_tx = event_tx.clone();

    let results = translate_batch(
        &state.client,
        &request,
        cancel,
        |progress| {
            if let Err(e) = progress_tx.try_send(AppEvent::Progress(progress)) {
                tracing::debug!("Dropping progress update: {e}");
            }
        },
        |key: &str, token: &str| {
            if let Err(e) = token_tx.try_send(AppEvent::Token {
                key: Some(key.to_string()),
                text: token.to_string(),
            }) {
                tracing::debug!("Dropping token: {e}");
            }
        },
    )
    .await
    .context("Batch translation aborted")?;

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        tracing::warn!("{failed} of {} entries failed", results.len());
    }

    let json = serde_json::to_string_pretty(&results)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} results to {}", results.len(), path.display());
        }
        None => event_tx.send(AppEvent::Output(json)).await?,
    }

    Ok(())
}
