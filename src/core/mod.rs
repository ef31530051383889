// LogTally - core/mod.rs
//
// Core business logic layer: line parsing and record-set statistics.
// Must NOT depend on: app, platform, or any filesystem access.

pub mod analyzer;
pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
