//! Tool seam between the conversational agent and the extraction core.
//!
//! The agent never interprets free text itself. It forwards arguments to a
//! named [`tools::Tool`] and hands the structured JSON result back to the
//! model:
//! - `preference_extractor_tool` - free text to a preference record
//! - `date_resolver_tool` - time expression to a date range with confidence
//!
//! Both tools are stateless; a single [`tools::ToolRegistry`] can serve
//! concurrent callers.

pub mod tools;
pub mod travel;

pub use tools::{Tool, ToolDescriptor, ToolError, ToolRegistry};
pub use travel::{default_registry, DateResolverTool, PreferenceExtractorTool};
