use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;

use crate::events::AppEvent;
use crate::state::AppState;

pub async fn handle_check(
    state: Arc<AppState>,
    event_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let base_url = &state.config.translator.base_url;

    let endpoint = state
        .client
        .check_connection(base_url)
        .await
        .context("Inference server is not reachable")?;

    event_tx
        .send(AppEvent::Output(format!("Inference server reachable at {endpoint}")))
        .await?;

    Ok(())
}
