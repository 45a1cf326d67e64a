use cruisemate_agent::{default_registry, ToolError};
use cruisemate_core::config::{AppConfig, LoadOptions};
use cruisemate_core::errors::ApplicationError;
use serde_json::Value;

use crate::commands::CommandResult;

/// Invokes a registered tool with a JSON arguments object, the way the agent does.
pub fn run(options: LoadOptions, tool: &str, arguments: &str) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("call", error.into(), None),
    };

    let input = match serde_json::from_str::<Value>(arguments) {
        Ok(input @ Value::Object(_)) => input,
        Ok(_) => {
            return CommandResult::from_error(
                "call",
                ApplicationError::InvalidArgument("tool arguments must be a JSON object".into()),
                None,
            );
        }
        Err(error) => {
            return CommandResult::from_error(
                "call",
                ApplicationError::InvalidArgument(format!("tool arguments are not JSON: {error}")),
                None,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "call",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let registry = default_registry(&config);
    match runtime.block_on(registry.execute(tool, input)) {
        Ok(result) => CommandResult::success_with("call", format!("{tool} completed"), result),
        Err(error) => match error.downcast::<ToolError>() {
            Ok(tool_error) => CommandResult::from_error(
                "call",
                ApplicationError::InvalidArgument(tool_error.to_string()),
                None,
            ),
            Err(error) => CommandResult::failure("call", "tool_execution", error.to_string(), 4),
        },
    }
}
