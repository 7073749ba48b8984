//! Editor lifecycle hooks.
//!
//! - [`after_edit`]: validate workflow files and log every edit.
//! - [`before_command`]: reject shell commands matching a deny rule.
//! - [`on_finish`]: post a run summary to a webhook.
//!
//! Each hook is a leaf: it takes its inputs and a [`hookgate_core::Config`]
//! and shares nothing with the others.

pub mod after_edit;
pub mod before_command;
pub mod on_finish;

pub use after_edit::{EditEvent, Validation};
pub use on_finish::{Delivery, Message, NotifyError, NotifyOutcome, RunPayload};
