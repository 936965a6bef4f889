use tui_textarea::Input;

use super::SessionId;

#[derive(Debug)]
pub enum Event {
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    /// Raw `data` of a single SSE event, tagged with the session that produced it.
    StreamMessage(SessionId, String),
    StreamTransportError(SessionId, String),
    UITick(),
}
