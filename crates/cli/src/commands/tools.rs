use cruisemate_agent::default_registry;
use cruisemate_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("tools", error.into(), None),
    };

    let registry = default_registry(&config);
    let descriptors = registry.descriptors();
    let message = format!("{} tools registered", descriptors.len());

    match serde_json::to_value(descriptors) {
        Ok(result) => CommandResult::success_with("tools", message, result),
        Err(error) => CommandResult::failure("tools", "serialization", error.to_string(), 3),
    }
}
