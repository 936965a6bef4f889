use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Event;
use super::StreamRequest;

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the backend is reachable before the first
    /// submission.
    async fn health_check(&self) -> Result<()>;

    /// Opens the event stream for a single submission and forwards the data of
    /// every event through the channel as `Event::StreamMessage`, tagged with
    /// the request's session.
    ///
    /// Returns once a terminal payload has been forwarded. Anything that stops
    /// the stream before that point (connection failures, unexpected status
    /// codes, the server hanging up early, read timeouts) is returned as an
    /// error.
    async fn stream_feeling<'a>(
        &self,
        request: StreamRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
