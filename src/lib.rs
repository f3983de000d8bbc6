//! Nutrition Text Analyzer (NTA) Library
//!
//! Turns free-text meal descriptions into quantified nutrition.

pub mod analyzer;
pub mod build_info;
pub mod config;
pub mod extraction;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
