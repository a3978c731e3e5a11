//! Integration layer for the version control backend.
//!
//! - [`git`]: the Git operations a sync run needs (status, stage, commit, rebase-pull, push)
//!
//! The backend is exposed as a trait with a real implementation over the `git` CLI
//! and a mock implementation for tests.

pub mod git;
