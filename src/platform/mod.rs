// LogTally - platform/mod.rs
//
// Platform abstraction layer: directories, config file, file reading.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
