use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(&self) -> SessionId {
        return SessionId(self.0 + 1);
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamRequest {
    pub session_id: SessionId,
    pub user_input: String,
}

impl StreamRequest {
    pub fn new(session_id: SessionId, user_input: &str) -> StreamRequest {
        return StreamRequest {
            session_id,
            user_input: user_input.trim().to_string(),
        };
    }
}
