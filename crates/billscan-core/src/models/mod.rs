//! Data models: bill results and pipeline configuration.

pub mod bill;
pub mod config;
