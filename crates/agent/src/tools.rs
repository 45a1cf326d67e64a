use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use cruisemate_core::config::parse_iso_date;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the arguments object accepted by [`Tool::execute`].
    fn input_schema(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("invalid argument for `{tool}`: {message}")]
    InvalidArgument { tool: &'static str, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.tools.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.names()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    pub async fn execute(&self, name: &str, input: Value) -> Result<Value> {
        let Some(tool) = self.get(name) else {
            warn!(event_name = "agent.tool.unknown", tool = name, "tool is not registered");
            return Err(ToolError::UnknownTool(name.to_string()).into());
        };

        let output = tool.execute(input).await;
        match &output {
            Ok(_) => debug!(event_name = "agent.tool.executed", tool = name, "tool call completed"),
            Err(error) => warn!(
                event_name = "agent.tool.failed",
                tool = name,
                error = %error,
                "tool call failed"
            ),
        }
        output
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub(crate) fn required_str<'a>(
    tool: &'static str,
    input: &'a Value,
    key: &str,
) -> Result<&'a str, ToolError> {
    match input.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => {
            Err(ToolError::InvalidArgument { tool, message: format!("`{key}` must be a string") })
        }
        None => Err(ToolError::InvalidArgument { tool, message: format!("`{key}` is required") }),
    }
}

/// A missing or `null` value is treated as absent.
pub(crate) fn optional_date(
    tool: &'static str,
    input: &Value,
    key: &str,
) -> Result<Option<NaiveDate>, ToolError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => parse_iso_date(raw).map(Some).ok_or_else(|| {
            ToolError::InvalidArgument {
                tool,
                message: format!("`{key}` must be a YYYY-MM-DD date, got `{raw}`"),
            }
        }),
        Some(_) => Err(ToolError::InvalidArgument {
            tool,
            message: format!("`{key}` must be a YYYY-MM-DD string"),
        }),
    }
}
