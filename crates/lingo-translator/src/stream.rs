use serde::Deserialize;

/// One line of the `/api/generate` stream
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Splits a newline-delimited JSON body into `response` fragments.
///
/// Works on raw bytes, so neither a line nor a UTF-8 sequence can be cut by a
/// chunk boundary: the unterminated tail is held until the next chunk.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning the fragments of every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split(|b| *b == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Decode whatever is left once the body has ended
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<GenerateChunk>(text) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                tracing::warn!("Server reported error mid-stream: {error}");
            }
            chunk.response
        }
        Err(e) => {
            tracing::trace!("Skipping malformed stream line: {e}");
            None
        }
    }
}
