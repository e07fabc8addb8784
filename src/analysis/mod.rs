//! Best-effort signal extraction from unified diffs

mod diff;
pub mod matchers;

pub use diff::{DiffInfo, Topic, analyze};
