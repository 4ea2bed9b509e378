use std::io::Write;

use kanal::AsyncReceiver;
use lingo_translator::BatchProgress;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw model output as it streams in
    Token { key: Option<String>, text: String },
    Progress(BatchProgress),
    /// One line of command output
    Output(String),
}

/// Drains events until every sender is dropped.
///
/// Command output goes to `out`; live tokens and progress go to `status`.
/// Batch tokens (those with a key) are only traced.
pub async fn render_loop<O, S>(
    event_rx: AsyncReceiver<AppEvent>,
    mut out: O,
    mut status: S,
) -> anyhow::Result<()>
where
    O: Write,
    S: Write,
{
    let mut mid_line = false;

    while let Ok(event) = event_rx.recv().await {
        match event {
            AppEvent::Token { key: None, text } => {
                write!(status, "{text}")?;
                status.flush()?;
                mid_line = true;
            }
            AppEvent::Token {
                key: Some(key),
                text,
            } => {
                tracing::trace!(key = %key, "{text}");
            }
            AppEvent::Progress(progress) => {
                if std::mem::take(&mut mid_line) {
                    writeln!(status)?;
                }
                let shown = if progress.translation.is_empty() {
                    "(failed)"
                } else {
                    progress.translation.as_str()
                };
                writeln!(
                    status,
                    "[{}/{}] {}: {}",
                    progress.completed, progress.total, progress.key, shown
                )?;
            }
            AppEvent::Output(line) => {
                if std::mem::take(&mut mid_line) {
                    writeln!(status)?;
                }
                writeln!(out, "{line}")?;
            }
        }
    }

    if mid_line {
        writeln!(status)?;
    }
    out.flush()?;

    Ok(())
}
