//! NTA Tools module
//!
//! MCP tool implementations for the Nutrition Text Analyzer.

pub mod analyze;
pub mod status;
