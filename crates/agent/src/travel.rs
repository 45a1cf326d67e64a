//! The cruise-planning tools exposed to the conversational agent.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use cruisemate_core::config::AppConfig;
use cruisemate_core::dates::DateResolver;
use cruisemate_core::preferences::PreferenceExtractor;
use serde_json::{json, Value};
use tracing::debug;

use crate::tools::{optional_date, required_str, Tool, ToolRegistry};

pub const PREFERENCE_EXTRACTOR_TOOL: &str = "preference_extractor_tool";
pub const DATE_RESOLVER_TOOL: &str = "date_resolver_tool";

#[derive(Clone, Debug, Default)]
pub struct PreferenceExtractorTool {
    extractor: PreferenceExtractor,
}

impl PreferenceExtractorTool {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Tool for PreferenceExtractorTool {
    fn name(&self) -> &'static str {
        PREFERENCE_EXTRACTOR_TOOL
    }

    fn description(&self) -> &'static str {
        "Extracts cruise lines, cabin types, budget, activities, destinations, special \
         requirements, party size and trip length from a traveller's message."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_input": {
                    "type": "string",
                    "description": "Natural language input from the user"
                }
            },
            "required": ["user_input"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let user_input = required_str(PREFERENCE_EXTRACTOR_TOOL, &input, "user_input")?;
        let record = self.extractor.extract(user_input);

        debug!(
            event_name = "agent.preferences.extracted",
            cruise_lines = record.cruise_lines.len(),
            destinations = record.destinations.len(),
            has_budget = record.budget_range.is_some(),
            "preferences extracted"
        );
        Ok(serde_json::to_value(record)?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DateResolverTool {
    resolver: DateResolver,
    default_reference_date: Option<NaiveDate>,
}

impl DateResolverTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `reference_date` whenever a call does not supply its own.
    pub fn with_reference_date(reference_date: Option<NaiveDate>) -> Self {
        Self { resolver: DateResolver::new(), default_reference_date: reference_date }
    }
}

#[async_trait]
impl Tool for DateResolverTool {
    fn name(&self) -> &'static str {
        DATE_RESOLVER_TOOL
    }

    fn description(&self) -> &'static str {
        "Resolves a vague time expression such as 'next summer', 'in 3 months' or 'june' \
         into a start and end date with a confidence score."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "time_expression": {
                    "type": "string",
                    "description": "Natural language time expression"
                },
                "reference_date": {
                    "type": "string",
                    "description": "Reference date in YYYY-MM-DD format (defaults to today)"
                }
            },
            "required": ["time_expression"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let expression = required_str(DATE_RESOLVER_TOOL, &input, "time_expression")?;
        let reference_date = optional_date(DATE_RESOLVER_TOOL, &input, "reference_date")?
            .or(self.default_reference_date);
        let range = self.resolver.resolve(expression, reference_date);

        debug!(
            event_name = "agent.dates.resolved",
            confidence = range.confidence,
            fallback = range.is_fallback(),
            "time expression resolved"
        );
        Ok(serde_json::to_value(range)?)
    }
}

/// Registry with both planning tools, honouring the configured reference date.
pub fn default_registry(config: &AppConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(PreferenceExtractorTool::new());
    registry.register(DateResolverTool::with_reference_date(config.resolver.reference_date));
    registry
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use cruisemate_core::config::AppConfig;
    use serde_json::json;

    use super::{
        default_registry, DateResolverTool, PreferenceExtractorTool, DATE_RESOLVER_TOOL,
        PREFERENCE_EXTRACTOR_TOOL,
    };
    use crate::tools::{Tool, ToolError};

    #[tokio::test]
    async fn preference_tool_returns_record_json() {
        let output = PreferenceExtractorTool::new()
            .execute(json!({
                "user_input": "I want a balcony cabin under $1500 for 4 people, 7 nights"
            }))
            .await
            .expect("extraction succeeds");

        assert_eq!(output["cabin_types"], json!(["balcony"]));
        assert_eq!(output["budget_range"], json!({"max": 1500.0}));
        assert_eq!(output["party_size"], 4);
        assert_eq!(output["duration_preference"], "7 nights");
        assert_eq!(output["cruise_lines"], json!([]));
    }

    #[tokio::test]
    async fn preference_tool_rejects_missing_input() {
        let error = PreferenceExtractorTool::new()
            .execute(json!({"text": "balcony"}))
            .await
            .expect_err("missing user_input");
        assert!(matches!(
            error.downcast_ref::<ToolError>(),
            Some(ToolError::InvalidArgument { tool, .. }) if *tool == PREFERENCE_EXTRACTOR_TOOL
        ));
    }

    #[tokio::test]
    async fn date_tool_uses_call_reference_date() {
        let output = DateResolverTool::new()
            .execute(json!({"time_expression": "next summer", "reference_date": "2024-07-01"}))
            .await
            .expect("resolution succeeds");

        assert_eq!(
            output,
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-08-31",
                "season": "summer",
                "confidence": 0.9
            })
        );
    }

    #[tokio::test]
    async fn date_tool_call_reference_beats_pinned_default() {
        let tool = DateResolverTool::with_reference_date(NaiveDate::from_ymd_opt(2030, 1, 1));

        let pinned = tool
            .execute(json!({"time_expression": "sometime nice"}))
            .await
            .expect("resolution succeeds");
        assert_eq!(pinned["start_date"], "2030-01-01");
        assert_eq!(pinned["end_date"], "2030-01-31");
        assert_eq!(pinned["confidence"], 0.3);

        let explicit = tool
            .execute(json!({"time_expression": "in 3 months", "reference_date": "2024-01-01"}))
            .await
            .expect("resolution succeeds");
        assert_eq!(explicit["start_date"], "2024-03-31");
        assert_eq!(explicit["months_ahead"], 3);
    }

    #[tokio::test]
    async fn date_tool_rejects_malformed_reference_date() {
        let error = DateResolverTool::new()
            .execute(json!({"time_expression": "june", "reference_date": "07/01/2024"}))
            .await
            .expect_err("malformed reference date");
        assert!(error.to_string().contains("reference_date"));
    }

    #[tokio::test]
    async fn default_registry_wires_both_tools() {
        let mut config = AppConfig::default();
        config.resolver.reference_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let registry = default_registry(&config);

        assert_eq!(registry.names(), vec![DATE_RESOLVER_TOOL, PREFERENCE_EXTRACTOR_TOOL]);

        let output = registry
            .execute(DATE_RESOLVER_TOOL, json!({"time_expression": "next summer"}))
            .await
            .expect("resolution succeeds");
        assert_eq!(output["start_date"], "2024-06-01");

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[1].input_schema["required"], json!(["user_input"]));
    }
}
