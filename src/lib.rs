//! git-scribe - terminal Git workspace with conventional-commit suggestions
//!
//! This library drives git through its porcelain output, infers commit types and scopes
//! from pending diffs, and hosts a keyboard-driven workspace for staging, committing,
//! branching, conflict resolution and history rewriting.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine
#![allow(clippy::option_as_ref_cloned)] // .as_ref().cloned() is sometimes clearer
#![allow(clippy::redundant_clone)] // Sometimes more explicit is clearer

pub mod analysis;
pub mod cli;
pub mod commit;
pub mod config;
pub mod conflict;
pub mod git;
pub mod logger;
pub mod studio;

// Re-export important structs and functions for easier testing
pub use config::Config;
pub use git::{GitError, GitRepo};
