//! Client and batch behaviour against in-memory fakes

mod batch_tests;

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{StreamExt, stream};

use crate::transport::{ByteStream, HttpResponse, HttpTransport, TransportError};

/// What the fake server does for one request
pub(crate) enum Reply {
    /// Connection-level failure
    Refuse,
    /// Never finishes connecting
    Hang,
    Respond {
        status: u16,
        /// `None` simulates a response without a readable body
        chunks: Option<Vec<Vec<u8>>>,
        /// Keep the body open after the last chunk
        keep_open: bool,
    },
    /// Delivers `chunks`, then fails the body read with `error`
    Broken {
        status: u16,
        chunks: Vec<Vec<u8>>,
        error: String,
    },
}

impl Reply {
    pub fn ok(chunks: &[&str]) -> Self {
        Reply::Respond {
            status: 200,
            chunks: Some(chunks.iter().map(|c| c.as_bytes().to_vec()).collect()),
            keep_open: false,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            chunks: Some(vec![body.as_bytes().to_vec()]),
            keep_open: false,
        }
    }
}

/// Transport serving scripted replies per URL. Unscripted URLs are refused.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<serde_json::Value>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.bodies.lock().unwrap().clone()
    }

    /// Timeouts passed to each GET, in call order
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    async fn serve(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Refuse);

        match reply {
            Reply::Refuse => Err(TransportError::Other(format!(
                "connection refused: {url}"
            ))),
            Reply::Hang => std::future::pending().await,
            Reply::Respond {
                status,
                chunks,
                keep_open,
            } => {
                let body = chunks.map(|chunks| {
                    let items = stream::iter(
                        chunks
                            .into_iter()
                            .map(|c| Ok::<_, TransportError>(Bytes::from(c))),
                    );
                    let body: ByteStream = if keep_open {
                        Box::pin(items.chain(stream::pending()))
                    } else {
                        Box::pin(items)
                    };
                    body
                });
                Ok(HttpResponse { status, body })
            }
            Reply::Broken {
                status,
                chunks,
                error,
            } => {
                let items = chunks
                    .into_iter()
                    .map(|c| Ok(Bytes::from(c)))
                    .chain(std::iter::once(Err(TransportError::Other(error))));
                let body: ByteStream = Box::pin(stream::iter(items));
                Ok(HttpResponse {
                    status,
                    body: Some(body),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.timeouts.lock().unwrap().push(timeout);
        self.serve(url).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.bodies.lock().unwrap().push(body.clone());
        self.serve(url).await
    }
}
