//! Operations modules for interacting with external version control systems.
//!
//! - [`git`]: Git operations used by the autopilot workflow (repository
//!   detection, staging, committing, fetching, rebasing, pushing, logging)
//!
//! The submodule provides a trait-based abstraction with a real implementation
//! that shells out to the `git` CLI and a mock implementation for tests.

pub mod git;
