use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use super::CommandError;
use crate::catalog::CatalogEntry;
use crate::import::ImportReport;

pub type Reply<T> = oneshot::Sender<Result<T, CommandError>>;

/// A write against the catalog, with the channel its result goes back on.
#[derive(Debug)]
pub enum CatalogCommand {
    Add {
        entry: CatalogEntry,
        reply: Reply<i64>,
    },
    Update {
        entry: CatalogEntry,
        reply: Reply<()>,
    },
    Delete {
        entry: CatalogEntry,
        reply: Reply<()>,
    },
    Import {
        path: PathBuf,
        reply: Reply<ImportReport>,
    },
}

impl CatalogCommand {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogCommand::Add { .. } => "add",
            CatalogCommand::Update { .. } => "update",
            CatalogCommand::Delete { .. } => "delete",
            CatalogCommand::Import { .. } => "import",
        }
    }

    /// True once the requester has stopped waiting for the result.
    pub fn is_abandoned(&self) -> bool {
        match self {
            CatalogCommand::Add { reply, .. } => reply.is_closed(),
            CatalogCommand::Update { reply, .. } => reply.is_closed(),
            CatalogCommand::Delete { reply, .. } => reply.is_closed(),
            CatalogCommand::Import { reply, .. } => reply.is_closed(),
        }
    }
}

/// Envelope wrapping a command with its submission time.
#[derive(Debug)]
pub struct CommandEnvelope {
    pub submitted_at: DateTime<Utc>,
    pub command: CatalogCommand,
}

impl CommandEnvelope {
    pub fn new(command: CatalogCommand) -> Self {
        Self {
            submitted_at: Utc::now(),
            command,
        }
    }
}
