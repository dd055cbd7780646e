//! Remote phases: `POST {server}/api/optimize/{phase}` and decode the chunked body.

use std::collections::VecDeque;
use std::fmt::Display;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use resumeflow::client::FrameStream;
use resumeflow::{AgentError, FrameDecoder, FrameSource, Phase, RunError};
use serde_json::Value;

/// [`FrameSource`] backed by a resumeflow-server.
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, phase: Phase) -> String {
        format!("{}{}", self.base_url, phase.endpoint())
    }
}

#[async_trait]
impl FrameSource for RemoteSource {
    async fn open(&self, phase: Phase, seed: Value) -> Result<FrameStream, RunError> {
        let url = self.url_for(phase);
        let response = self
            .client
            .post(&url)
            .json(&seed)
            .send()
            .await
            .map_err(|e| AgentError::Service(format!("POST {} failed: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Service(format!("POST {} returned {}: {}", url, status, body)).into());
        }
        Ok(decode_body(Box::pin(response.bytes_stream())))
    }
}

/// Turns a chunked body into frames. A transport error or a truncated last record
/// ends the stream; whatever decoded before that is kept.
pub fn decode_body<S, B, E>(body: S) -> FrameStream
where
    S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = (body, FrameDecoder::new(), VecDeque::new());
    futures::stream::unfold(state, |(mut body, mut decoder, mut ready)| async move {
        loop {
            if let Some(frame) = ready.pop_front() {
                return Some((frame, (body, decoder, ready)));
            }
            match body.next().await {
                Some(Ok(chunk)) => ready.extend(decoder.push(chunk.as_ref())),
                Some(Err(e)) => {
                    eprintln!("[remote] body read failed: {}", e);
                    return None;
                }
                None => {
                    if let Err(e) = decoder.finish() {
                        eprintln!("[remote] {}", e);
                    }
                    return None;
                }
            }
        }
    })
    .boxed()
}
