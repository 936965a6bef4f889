#[cfg(test)]
#[path = "ask_test.rs"]
mod tests;

use std::io;
use std::io::Write;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::Submission;
use crate::infrastructure::backends::FeelerApi;

pub async fn run(feeling: &str) -> Result<()> {
    let mut stdout = io::stdout();
    return run_with_backend(feeling, Box::<FeelerApi>::default(), &mut stdout).await;
}

/// Drives a single submission to the end without a terminal UI. Every status
/// change is written as its own line, followed by the encouragement.
pub async fn run_with_backend<W: Write>(
    feeling: &str,
    backend: BackendBox,
    out: &mut W,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let service = tokio::spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx).await;
    });

    let mut submission = Submission::default();
    submission.set_user_input(feeling);
    if !submission.submit(&action_tx) {
        bail!("Nothing to submit, the feeling is empty.");
    }

    let mut last_status = "".to_string();
    loop {
        if submission.status() != last_status {
            last_status = submission.status().to_string();
            writeln!(out, "{last_status}")?;
        }

        if !submission.is_processing() {
            break;
        }

        match event_rx.recv().await {
            Some(Event::StreamMessage(session_id, raw)) => {
                submission.on_stream_message(session_id, &raw, &action_tx);
            }
            Some(Event::StreamTransportError(session_id, err)) => {
                submission.on_stream_transport_error(session_id, &err, &action_tx);
            }
            Some(_) => {
                continue;
            }
            None => {
                if let Some(session_id) = submission.session_id() {
                    submission.on_stream_transport_error(
                        session_id,
                        "Event channel closed",
                        &action_tx,
                    );
                }
            }
        }
    }

    submission.teardown(&action_tx);
    drop(action_tx);
    service.await??;

    if submission.encouragement().is_empty() {
        bail!(submission.status().to_string());
    }

    writeln!(out, "\n{}", submission.encouragement())?;
    out.flush()?;

    return Ok(());
}
