use std::sync::Arc;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use crate::cli::Command;
use crate::events::AppEvent;
use crate::state::AppState;

pub mod batch;
pub mod check;
pub mod models;
pub mod translate;

use batch::handle_batch;
use check::handle_check;
use models::handle_models;
use translate::handle_translate;

pub async fn handle_command(
    state: Arc<AppState>,
    command: Command,
    cancel: &CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::debug!("Running {:?}", command);

    match command {
        Command::Check => handle_check(state, &event_tx).await,
        Command::Models => handle_models(state, &event_tx).await,
        Command::Translate { text, key, comment } => {
            handle_translate(state, text, key, comment, cancel, &event_tx).await
        }
        Command::Batch { input, output } => {
            handle_batch(state, &input, output.as_deref(), cancel, &event_tx).await
        }
    }
}
