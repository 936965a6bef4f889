#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::SessionId;
use crate::domain::models::StreamRequest;

struct Worker {
    session_id: SessionId,
    handle: JoinHandle<Result<()>>,
}

impl Worker {
    fn abort(self) {
        tracing::debug!(session_id = %self.session_id, "Aborting stream worker");
        self.handle.abort();
    }
}

fn worker_error(
    session_id: SessionId,
    err: anyhow::Error,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::error!(session_id = %session_id, err = ?err, "Stream worker failed");
    tx.send(Event::StreamTransportError(
        session_id,
        format!("{err:#}"),
    ))?;

    return Ok(());
}

fn spawn_worker(
    backend: Arc<dyn Backend + Send + Sync>,
    request: StreamRequest,
    tx: mpsc::UnboundedSender<Event>,
) -> Worker {
    let session_id = request.session_id;
    let handle = tokio::spawn(async move {
        let res = backend.stream_feeling(request, &tx).await;
        if let Err(err) = res {
            worker_error(session_id, err, &tx)?;
        }

        return Ok(());
    });

    return Worker { session_id, handle };
}

/// Runs the stream workers requested by a `Submission`. Only one worker is
/// ever alive, opening a new stream aborts whatever was still running.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend: Arc<dyn Backend + Send + Sync> = Arc::from(backend);
        let mut worker: Option<Worker> = None;

        while let Some(action) = rx.recv().await {
            match action {
                Action::StreamOpen(request) => {
                    if let Some(previous) = worker.take() {
                        previous.abort();
                    }

                    tracing::debug!(session_id = %request.session_id, "Starting stream worker");
                    worker = Some(spawn_worker(backend.clone(), request, tx.clone()));
                }
                Action::StreamClose(session_id) => {
                    if let Some(current) = worker.take() {
                        if current.session_id == session_id {
                            current.abort();
                        } else {
                            worker = Some(current);
                        }
                    }
                }
            }
        }

        if let Some(current) = worker.take() {
            current.abort();
        }

        return Ok(());
    }
}
