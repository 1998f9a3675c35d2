//! Commit everything in a git working copy, rebase it onto the upstream
//! branch and push it.
//!
//! [`App::cmd_run`] drives the workflow through the [`ops::git::GitOps`]
//! trait; [`Config`] carries the remote, upstream and ignore-file settings.

pub mod commands;
pub mod config;
pub mod ops;

mod app;

pub use app::App;
pub use config::Config;

#[cfg(test)]
#[ctor::ctor]
fn disable_colors() {
    colored::control::set_override(false);
}
