//! ComfyUI WebSocket message types and parser.
//!
//! ComfyUI sends JSON messages shaped `{"type": "<kind>", "data": {...}}`.
//! Only the fields the completion waiter consumes are modelled; extra
//! fields on the wire are ignored by serde.

use serde::Deserialize;

/// Job-status messages observed while waiting for a prompt to finish.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ComfyUIMessage {
    /// Queue status broadcast.
    #[serde(rename = "status")]
    Status(StatusData),

    /// A prompt has started executing.
    #[serde(rename = "execution_start")]
    ExecutionStart(PromptRef),

    /// Node outputs were served from cache.
    #[serde(rename = "execution_cached")]
    ExecutionCached(PromptRef),

    /// A node is executing. `node == None` means the prompt finished.
    #[serde(rename = "executing")]
    Executing(ExecutingData),

    /// Step-level progress within a long-running node.
    #[serde(rename = "progress")]
    Progress(ProgressData),

    /// A node finished and produced output.
    #[serde(rename = "executed")]
    Executed(PromptRef),

    /// Execution failed.
    #[serde(rename = "execution_error")]
    ExecutionError(ExecutionErrorData),
}

/// Payloads that only matter for their prompt id.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRef {
    pub prompt_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    pub status: QueueStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueStatus {
    pub exec_info: ExecInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecInfo {
    pub queue_remaining: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutingData {
    pub node: Option<String>,
    pub prompt_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressData {
    pub value: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionErrorData {
    pub prompt_id: String,
    pub exception_message: String,
    pub exception_type: String,
}

/// Parse a WebSocket text frame into a typed message.
///
/// Returns `Err` for malformed JSON or unknown `type` values; the
/// waiter logs those and keeps reading.
pub fn parse_message(text: &str) -> Result<ComfyUIMessage, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_executing_with_node() {
        let json = r#"{"type":"executing","data":{"node":"3","prompt_id":"p-1"}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::Executing(data) => {
                assert_eq!(data.node.as_deref(), Some("3"));
                assert_eq!(data.prompt_id, "p-1");
            }
            other => panic!("Expected Executing, got {other:?}"),
        }
    }

    #[test]
    fn parse_executing_completion_has_empty_node() {
        let json = r#"{"type":"executing","data":{"node":null,"prompt_id":"p-1"}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::Executing(data) => assert!(data.node.is_none()),
            other => panic!("Expected Executing, got {other:?}"),
        }
    }

    #[test]
    fn parse_progress() {
        let json = r#"{"type":"progress","data":{"value":12,"max":20}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::Progress(data) => {
                assert_eq!(data.value, 12);
                assert_eq!(data.max, 20);
            }
            other => panic!("Expected Progress, got {other:?}"),
        }
    }

    #[test]
    fn parse_status_queue_depth() {
        let json = r#"{"type":"status","data":{"status":{"exec_info":{"queue_remaining":2}}}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::Status(data) => {
                assert_eq!(data.status.exec_info.queue_remaining, 2);
            }
            other => panic!("Expected Status, got {other:?}"),
        }
    }

    #[test]
    fn parse_execution_error() {
        let json = r#"{"type":"execution_error","data":{"prompt_id":"p-1","node_id":"3","exception_message":"out of memory","exception_type":"RuntimeError"}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::ExecutionError(data) => {
                assert_eq!(data.prompt_id, "p-1");
                assert_eq!(data.exception_message, "out of memory");
            }
            other => panic!("Expected ExecutionError, got {other:?}"),
        }
    }

    #[test]
    fn parse_executed_ignores_output_payload() {
        let json = r#"{"type":"executed","data":{"node":"9","output":{"images":[{"filename":"a.png"}]},"prompt_id":"p-1"}}"#;
        match parse_message(json).unwrap() {
            ComfyUIMessage::Executed(data) => assert_eq!(data.prompt_id, "p-1"),
            other => panic!("Expected Executed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(parse_message(r#"{"type":"crystools.monitor","data":{}}"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_message("not json").is_err());
    }
}
