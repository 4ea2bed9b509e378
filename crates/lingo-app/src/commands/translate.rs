use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use lingo_translator::{TranslationRequest, Translator};
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;
use crate::state::AppState;

pub async fn handle_translate(
    state: Arc<AppState>,
    text: String,
    key: Option<String>,
    comment: Option<String>,
    cancel: &CancellationToken,
    event_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let request = {
        let config = &state.config.translator;
        TranslationRequest {
            text,
            source_locale: config.from_lang.clone(),
            target_locale: config.to_lang.clone(),
            key,
            comment,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    };

    let token_tx = event_tx.clone();
    let mut on_token = |token: &str| {
        if let Err(e) = token_tx.try_send(AppEvent::Token {
            key: None,
            text: token.to_string(),
        }) {
            tracing::debug!("Dropping token: {e}");
        }
    };

    let translation = state
        .client
        .translate(&request, cancel, &mut on_token)
        .await
        .context("Translation failed")?;

    event_tx.send(AppEvent::Output(translation)).await?;

    Ok(())
}
