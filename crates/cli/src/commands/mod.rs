pub mod call;
pub mod config;
pub mod extract;
pub mod resolve;
pub mod tools;

use cruisemate_core::errors::{ApplicationError, InterfaceError};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

impl CommandResult {
    pub fn success_with(command: &str, message: impl Into<String>, result: Value) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            result: Some(result),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with(command, error_class, message, exit_code, None)
    }

    fn failure_with(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        result: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            result,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application error onto its exit code and a user-safe message,
    /// attaching `result` when a partial answer is still worth showing.
    pub fn from_error(command: &str, error: ApplicationError, result: Option<Value>) -> Self {
        let exit_code = exit_code_for(&error);
        let error_class = error.error_class();
        let detail = error.to_string();
        let interface = InterfaceError::from(error);
        let message = format!("{} ({detail})", interface.user_message());
        Self::failure_with(command, error_class, message, exit_code, result)
    }
}

pub fn exit_code_for(error: &ApplicationError) -> u8 {
    match error {
        ApplicationError::LowConfidence { .. } => 1,
        ApplicationError::Configuration(_) => 2,
        ApplicationError::InvalidArgument(_) => 64,
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
