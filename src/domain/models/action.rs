use super::SessionId;
use super::StreamRequest;

#[derive(Debug)]
pub enum Action {
    StreamClose(SessionId),
    StreamOpen(StreamRequest),
}
