//! CLI subcommand implementations for the tripwire binary.

pub mod baseline_cmd;
pub mod output;
pub mod probes_cmd;
pub mod scan_cmd;
