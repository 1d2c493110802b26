// Hubs customer map - data tooling core
//
// Batch jobs that turn the DIGG connection tables into the map's data:
// a generated TypeScript module, Postgres rows, and an in-place status patch.
//
// Each job lives in domains/*, the binaries in src/bin are thin wrappers.

pub mod common;
pub mod config;
pub mod domains;

pub use config::*;
