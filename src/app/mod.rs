// LogTally - app/mod.rs
//
// Application layer: record storage, batch import, report assembly.
// Dependencies: core layer, platform file reading.

pub mod import;
pub mod report;
pub mod store;
