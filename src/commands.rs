//! User-facing commands, implemented as methods on [`crate::App`].

mod sync;

pub use sync::Step;
pub use sync::SyncOutcome;
pub use sync::commit_message;
