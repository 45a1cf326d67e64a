use cruisemate_core::preferences::PreferenceExtractor;
use tracing::info;

use crate::commands::CommandResult;

pub fn run(text: &str) -> CommandResult {
    let record = PreferenceExtractor::new().extract(text);
    info!(
        event_name = "cli.extract.completed",
        empty = record.is_empty(),
        "preference extraction completed"
    );

    let message = if record.is_empty() {
        "no preferences recognised".to_string()
    } else {
        "extracted preferences".to_string()
    };

    match serde_json::to_value(&record) {
        Ok(result) => CommandResult::success_with("extract", message, result),
        Err(error) => CommandResult::failure("extract", "serialization", error.to_string(), 3),
    }
}
