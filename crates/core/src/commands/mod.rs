//! Background command queue for catalog writes.
//!
//! Admin mutations and imports are sent to a single [`CommandWorker`] which
//! executes them in order on the blocking pool. Every command carries a
//! `oneshot` reply so the caller learns the outcome.

mod command;
mod handle;
mod worker;

pub use command::*;
pub use handle::*;
pub use worker::*;

use thiserror::Error;

use crate::catalog::StoreError;
use crate::import::ImportError;

/// Errors returned to a command's requester.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command queue is closed")]
    QueueClosed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Import(#[from] ImportError),
}
