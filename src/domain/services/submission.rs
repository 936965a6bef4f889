#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;

use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::SessionId;
use crate::domain::models::StreamPayload;
use crate::domain::models::StreamRequest;

pub const IDLE_STATUS: &str = "Enter your feeling below";
pub const STARTING_STATUS: &str = "Starting...";
pub const CONNECTION_ERROR_STATUS: &str = "❌ Connection error";

struct Connection {
    session_id: SessionId,
}

/// Owns everything a single feeling submission needs: the text being typed,
/// the latest status from the backend, the final encouragement, and the one
/// stream that may be open at a time.
///
/// Nothing here talks to the network directly. Opening and closing streams is
/// requested through `Action`s, and every event coming back is tagged with the
/// session it belongs to so that anything from a closed stream is dropped.
pub struct Submission {
    user_input: String,
    status: String,
    encouragement: String,
    connection: Option<Connection>,
    last_session_id: SessionId,
}

impl Default for Submission {
    fn default() -> Submission {
        return Submission::new(IDLE_STATUS);
    }
}

impl Submission {
    pub fn new(initial_status: &str) -> Submission {
        return Submission {
            user_input: "".to_string(),
            status: initial_status.to_string(),
            encouragement: "".to_string(),
            connection: None,
            last_session_id: SessionId::default(),
        };
    }

    pub fn set_user_input(&mut self, text: &str) {
        self.user_input = text.to_string();
    }

    pub fn status(&self) -> &str {
        return &self.status;
    }

    pub fn encouragement(&self) -> &str {
        return &self.encouragement;
    }

    pub fn is_processing(&self) -> bool {
        return self.connection.is_some();
    }

    pub fn session_id(&self) -> Option<SessionId> {
        return self
            .connection
            .as_ref()
            .map(|connection| return connection.session_id);
    }

    pub fn can_submit(&self) -> bool {
        return !self.is_processing() && !self.user_input.trim().is_empty();
    }

    /// Starts a new session for the current input. Returns false when the
    /// submission was ignored, either because the input is blank or because a
    /// session is still streaming.
    pub fn submit(&mut self, tx: &mpsc::UnboundedSender<Action>) -> bool {
        if self.user_input.trim().is_empty() {
            return false;
        }
        if self.is_processing() {
            tracing::debug!("Ignoring submission while a session is streaming");
            return false;
        }

        // At most one open stream at a time.
        self.close_connection(tx);

        self.encouragement = "".to_string();
        self.status = STARTING_STATUS.to_string();

        let session_id = self.last_session_id.next();
        self.last_session_id = session_id;
        self.connection = Some(Connection { session_id });

        let request = StreamRequest::new(session_id, &self.user_input);
        tracing::debug!(session_id = %session_id, input = %request.user_input, "Opening stream");

        if let Err(err) = tx.send(Action::StreamOpen(request)) {
            self.on_stream_transport_error(session_id, &err.to_string(), tx);
        }

        return true;
    }

    pub fn on_stream_message(
        &mut self,
        session_id: SessionId,
        raw: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) {
        if !self.is_current(session_id) {
            tracing::debug!(session_id = %session_id, "Dropping message from a closed stream");
            return;
        }

        let payload = match StreamPayload::parse(raw) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(session_id = %session_id, err = ?err, "Stream payload could not be parsed");
                self.on_stream_transport_error(session_id, &err.to_string(), tx);
                return;
            }
        };

        tracing::debug!(session_id = %session_id, payload = ?payload, "Stream message");

        if let Some(message) = payload
            .message
            .as_deref()
            .filter(|message| return !message.is_empty())
        {
            self.status = message.to_string();
        }

        if let Some(output) = payload.completed_output() {
            self.encouragement = output.to_string();
        }

        if payload.is_terminal() {
            self.close_connection(tx);
        }
    }

    pub fn on_stream_transport_error(
        &mut self,
        session_id: SessionId,
        err: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) {
        if !self.is_current(session_id) {
            return;
        }

        tracing::error!(session_id = %session_id, err, "Stream failed");
        self.status = CONNECTION_ERROR_STATUS.to_string();
        self.close_connection(tx);
    }

    /// Closes whatever stream is still open. Called when the front-end goes
    /// away.
    pub fn teardown(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        self.close_connection(tx);
    }

    fn is_current(&self, session_id: SessionId) -> bool {
        return self.session_id() == Some(session_id);
    }

    fn close_connection(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        if let Some(connection) = self.connection.take() {
            tracing::debug!(session_id = %connection.session_id, "Closing stream");
            if tx.send(Action::StreamClose(connection.session_id)).is_err() {
                tracing::debug!(session_id = %connection.session_id, "Actions service already stopped");
            }
        }
    }
}
