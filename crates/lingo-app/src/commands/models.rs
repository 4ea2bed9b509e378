use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;

use crate::events::AppEvent;
use crate::state::AppState;

pub async fn handle_models(
    state: Arc<AppState>,
    event_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let base_url = &state.config.translator.base_url;

    let models = state
        .client
        .list_models(base_url)
        .await
        .context("Failed to list models")?;

    if models.is_empty() {
        tracing::warn!("No models installed on {base_url}");
    }

    for model in models {
        event_tx
            .send(AppEvent::Output(format!(
                "{}\t{}\t{}",
                model.name, model.size, model.modified_at
            )))
            .await?;
    }

    Ok(())
}
