//! Top-level commands exposed by the CLI.

mod run;
