use cruisemate_core::config::{parse_iso_date, AppConfig, LoadOptions};
use cruisemate_core::dates::{DateRange, DateResolver};
use cruisemate_core::errors::ApplicationError;
use tracing::info;

use crate::commands::CommandResult;

#[derive(Clone, Debug, Default)]
pub struct ResolveArgs {
    pub expression: String,
    pub reference_date: Option<String>,
    pub min_confidence: Option<f64>,
}

pub fn run(options: LoadOptions, args: &ResolveArgs) -> CommandResult {
    let (range, minimum) = match resolve(options, args) {
        Ok(resolved) => resolved,
        Err(error) => return CommandResult::from_error("resolve", error, None),
    };

    let result = match serde_json::to_value(&range) {
        Ok(result) => result,
        Err(error) => {
            return CommandResult::failure("resolve", "serialization", error.to_string(), 3);
        }
    };

    // The range is still returned so callers can show what was understood.
    if !range.meets(minimum) {
        return CommandResult::from_error(
            "resolve",
            ApplicationError::LowConfidence { confidence: range.confidence, minimum },
            Some(result),
        );
    }

    CommandResult::success_with(
        "resolve",
        format!("resolved with confidence {}", range.confidence),
        result,
    )
}

fn resolve(options: LoadOptions, args: &ResolveArgs) -> Result<(DateRange, f64), ApplicationError> {
    let config = AppConfig::load(options)?;

    let reference_date = match args.reference_date.as_deref() {
        Some(raw) => Some(parse_iso_date(raw).ok_or_else(|| {
            ApplicationError::InvalidArgument(format!(
                "--reference-date `{raw}` must be a YYYY-MM-DD date"
            ))
        })?),
        None => config.resolver.reference_date,
    };

    let minimum = args.min_confidence.unwrap_or(config.resolver.min_confidence);
    if !(0.0..=1.0).contains(&minimum) {
        return Err(ApplicationError::InvalidArgument(format!(
            "--min-confidence `{minimum}` must be in range 0.0..=1.0"
        )));
    }

    let range = DateResolver::new().resolve(&args.expression, reference_date);
    info!(
        event_name = "cli.resolve.completed",
        confidence = range.confidence,
        minimum,
        "time expression resolved"
    );

    Ok((range, minimum))
}
