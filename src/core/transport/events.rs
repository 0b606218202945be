//! Server-sent event messages queued for client streams.

use serde::{Deserialize, Serialize};

use crate::domains::tools::FunctionCallResult;

/// Event emitted once when a stream opens.
pub const READY_EVENT: &str = "ready";

/// Event carrying a `{function, result}` payload.
pub const FUNCTION_CALL_RESULT_EVENT: &str = "function_call_result";

/// A named event with a single-line data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMessage {
    pub event: String,
    pub data: String,
}

impl StreamMessage {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    /// The `ready` event, with an empty JSON object as data.
    pub fn ready() -> Self {
        Self::new(READY_EVENT, "{}")
    }

    /// Wrap a tool result as a `function_call_result` event.
    pub fn function_call_result(result: &FunctionCallResult) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            FUNCTION_CALL_RESULT_EVENT,
            serde_json::to_string(result)?,
        ))
    }

    /// Wire form: `event: <name>\ndata: <data>\n\n`.
    pub fn encode(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }

    /// Parse one encoded event. Comment lines are skipped; multiple `data`
    /// lines are joined with `\n`. Returns `None` when no `data` is present.
    pub fn decode(frame: &str) -> Option<Self> {
        let mut event = None;
        let mut data: Option<String> = None;

        for line in frame.lines() {
            if line.starts_with(':') {
                continue;
            }
            let (field, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.strip_prefix(' ').unwrap_or(value);
            match field {
                "event" => event = Some(value.to_string()),
                "data" => match data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(value);
                    }
                    None => data = Some(value.to_string()),
                },
                _ => {}
            }
        }

        data.map(|data| Self {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }

    /// Parse the data of a `function_call_result` event.
    pub fn to_function_call_result(&self) -> Option<FunctionCallResult> {
        if self.event != FUNCTION_CALL_RESULT_EVENT {
            return None;
        }
        serde_json::from_str(&self.data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolOutcome;
    use serde_json::json;

    #[test]
    fn test_ready_encoding() {
        assert_eq!(StreamMessage::ready().encode(), "event: ready\ndata: {}\n\n");
    }

    #[test]
    fn test_function_call_result_survives_the_wire() {
        let result = FunctionCallResult::new(
            "get_product",
            ToolOutcome::Completed(json!({"id": 1, "name": "Line\nbreak"})),
        );
        let message = StreamMessage::function_call_result(&result).unwrap();
        assert!(!message.data.contains('\n'));

        let decoded = StreamMessage::decode(&message.encode()).unwrap();
        assert_eq!(decoded.event, FUNCTION_CALL_RESULT_EVENT);
        assert_eq!(decoded.to_function_call_result(), Some(result));
    }

    #[test]
    fn test_decode_skips_comments() {
        assert_eq!(StreamMessage::decode(": keep-alive\n\n"), None);

        let decoded = StreamMessage::decode(": hi\nevent: x\ndata: a\ndata: b\n\n").unwrap();
        assert_eq!(decoded, StreamMessage::new("x", "a\nb"));
    }
}
