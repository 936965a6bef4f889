use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::Event;
use crate::domain::models::SessionId;
use crate::domain::models::StreamRequest;

enum Outcome {
    Complete,
    Fail(&'static str),
    Hang,
}

struct ScriptedBackend {
    messages: Vec<&'static str>,
    delay: Duration,
    outcome: Outcome,
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn stream_feeling<'a>(
        &self,
        request: StreamRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        for message in self.messages.iter() {
            tx.send(Event::StreamMessage(
                request.session_id,
                message.to_string(),
            ))?;
            time::sleep(self.delay).await;
        }

        match self.outcome {
            Outcome::Complete => return Ok(()),
            Outcome::Fail(err) => bail!(err),
            Outcome::Hang => {
                futures::future::pending::<()>().await;
                return Ok(());
            }
        }
    }
}

fn start(
    backend: ScriptedBackend,
) -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
    JoinHandle<Result<()>>,
) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let service = tokio::spawn(async move {
        return ActionsService::start(Box::new(backend), event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx, service);
}

fn open(session: u64, input: &str) -> Action {
    let mut session_id = SessionId::default();
    for _ in 0..session {
        session_id = session_id.next();
    }

    return Action::StreamOpen(StreamRequest::new(session_id, input));
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<Event>) -> Result<Option<Event>> {
    let event = time::timeout(Duration::from_secs(2), rx.recv()).await?;
    return Ok(event);
}

#[tokio::test]
async fn it_forwards_stream_messages() -> Result<()> {
    let (tx, mut rx, _service) = start(ScriptedBackend {
        messages: vec![r#"{"message":"Thinking..."}"#, r#"{"status":"complete"}"#],
        delay: Duration::from_millis(0),
        outcome: Outcome::Complete,
    });

    tx.send(open(1, "happy"))?;

    match recv(&mut rx).await? {
        Some(Event::StreamMessage(session_id, data)) => {
            assert_eq!(session_id, SessionId::default().next());
            assert_eq!(data, r#"{"message":"Thinking..."}"#);
        }
        _ => bail!("Wrong event"),
    }
    match recv(&mut rx).await? {
        Some(Event::StreamMessage(_, data)) => {
            assert_eq!(data, r#"{"status":"complete"}"#);
        }
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_worker_failures_as_transport_errors() -> Result<()> {
    let (tx, mut rx, _service) = start(ScriptedBackend {
        messages: vec![],
        delay: Duration::from_millis(0),
        outcome: Outcome::Fail("connection refused"),
    });

    tx.send(open(1, "happy"))?;

    match recv(&mut rx).await? {
        Some(Event::StreamTransportError(session_id, err)) => {
            assert_eq!(session_id, SessionId::default().next());
            assert_eq!(err, "connection refused");
        }
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_ignores_close_requests_for_other_sessions() -> Result<()> {
    let (tx, mut rx, _service) = start(ScriptedBackend {
        messages: vec![r#"{"message":"one"}"#, r#"{"message":"two"}"#],
        delay: Duration::from_millis(50),
        outcome: Outcome::Complete,
    });

    tx.send(open(2, "happy"))?;
    tx.send(Action::StreamClose(SessionId::default().next()))?;

    assert!(matches!(
        recv(&mut rx).await?,
        Some(Event::StreamMessage(_, _))
    ));
    assert!(matches!(
        recv(&mut rx).await?,
        Some(Event::StreamMessage(_, _))
    ));

    return Ok(());
}

#[tokio::test]
async fn it_aborts_closed_workers() -> Result<()> {
    let (tx, mut rx, service) = start(ScriptedBackend {
        messages: vec![r#"{"message":"Thinking..."}"#],
        delay: Duration::from_millis(0),
        outcome: Outcome::Hang,
    });

    tx.send(open(1, "happy"))?;
    assert!(matches!(
        recv(&mut rx).await?,
        Some(Event::StreamMessage(_, _))
    ));

    tx.send(Action::StreamClose(SessionId::default().next()))?;
    drop(tx);
    service.await??;

    // Every sender is gone once the hanging worker has been aborted.
    assert!(recv(&mut rx).await?.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_aborts_running_workers_on_shutdown() -> Result<()> {
    let (tx, mut rx, service) = start(ScriptedBackend {
        messages: vec![],
        delay: Duration::from_millis(0),
        outcome: Outcome::Hang,
    });

    tx.send(open(1, "happy"))?;
    tx.send(open(2, "happy"))?;
    drop(tx);
    service.await??;

    assert!(recv(&mut rx).await?.is_none());

    return Ok(());
}
