use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::cli::Command;
use crate::commands::handle_command;
use crate::events::render_loop;
use crate::state::AppState;

/// Runs one command alongside the renderer and the Ctrl+C watcher
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn run(&self, command: Command) -> anyhow::Result<()> {
        let (event_tx, event_rx) = kanal::unbounded_async();

        let mut tasks = JoinSet::new();
        tasks.spawn(render_loop(event_rx, std::io::stdout(), std::io::stderr()));

        let cancel = self.cancel_token.clone();
        let watcher = tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                tracing::info!("Cancellation requested");
                cancel.cancel();
            }
        });

        let result = handle_command(self.state.clone(), command, &self.cancel_token, event_tx).await;
        watcher.abort();

        // Renderer exits once the command has dropped its sender
        while let Some(joined) = tasks.join_next().await {
            joined??;
        }

        result
    }
}
