//! Data models: configuration, parser documents, and extraction records.

pub mod config;
pub mod document;
pub mod payslip;
