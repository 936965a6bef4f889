#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize as _;
use serde::Deserializer;
use serde_derive::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamStatus {
    Complete,
    Error,
    /// Progress values such as `interpreting` or `judging`.
    Other(String),
}

impl From<String> for StreamStatus {
    fn from(value: String) -> StreamStatus {
        match value.as_str() {
            "complete" => return StreamStatus::Complete,
            "error" => return StreamStatus::Error,
            _ => return StreamStatus::Other(value),
        }
    }
}

/// Anything other than a string status is read as no status at all.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<StreamStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(status) => return Ok(Some(StreamStatus::from(status))),
        _ => return Ok(None),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StreamPayloadData {
    pub output: Option<String>,
}

/// Body of a single server pushed event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StreamPayload {
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<StreamStatus>,
    pub data: Option<StreamPayloadData>,
}

impl StreamPayload {
    pub fn parse(raw: &str) -> Result<StreamPayload> {
        let payload = serde_json::from_str::<StreamPayload>(raw)
            .with_context(|| return format!("Malformed stream payload: {raw}"))?;

        return Ok(payload);
    }

    pub fn is_terminal(&self) -> bool {
        return matches!(
            self.status,
            Some(StreamStatus::Complete) | Some(StreamStatus::Error)
        );
    }

    /// The encouragement carried by a successful completion. Outputs attached to
    /// any other status are not considered final.
    pub fn completed_output(&self) -> Option<&str> {
        if self.status != Some(StreamStatus::Complete) {
            return None;
        }

        return self
            .data
            .as_ref()
            .and_then(|data| return data.output.as_deref());
    }
}
