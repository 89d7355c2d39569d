use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use super::{CatalogCommand, CommandEnvelope, CommandError};
use crate::catalog::CatalogEntry;
use crate::import::ImportReport;

/// Handle for submitting catalog writes.
///
/// This is cheaply cloneable and can be shared across tasks. Each method
/// waits for the worker to run the command and returns its result.
#[derive(Clone)]
pub struct CommandHandle {
    tx: mpsc::Sender<CommandEnvelope>,
}

impl CommandHandle {
    pub fn new(tx: mpsc::Sender<CommandEnvelope>) -> Self {
        Self { tx }
    }

    /// Queue a raw command. The result arrives on the command's reply channel.
    pub async fn submit(&self, command: CatalogCommand) -> Result<(), CommandError> {
        self.tx
            .send(CommandEnvelope::new(command))
            .await
            .map_err(|_| CommandError::QueueClosed)
    }

    /// Insert a new entry and return its id.
    pub async fn add(&self, entry: CatalogEntry) -> Result<i64, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.submit(CatalogCommand::Add { entry, reply }).await?;
        rx.await.map_err(|_| CommandError::QueueClosed)?
    }

    /// Replace the stored entry with the same id.
    pub async fn update(&self, entry: CatalogEntry) -> Result<(), CommandError> {
        let (reply, rx) = oneshot::channel();
        self.submit(CatalogCommand::Update { entry, reply }).await?;
        rx.await.map_err(|_| CommandError::QueueClosed)?
    }

    pub async fn delete(&self, entry: CatalogEntry) -> Result<(), CommandError> {
        let (reply, rx) = oneshot::channel();
        self.submit(CatalogCommand::Delete { entry, reply }).await?;
        rx.await.map_err(|_| CommandError::QueueClosed)?
    }

    /// Replace the whole catalog with the contents of an import file.
    pub async fn import(&self, path: impl Into<PathBuf>) -> Result<ImportReport, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.submit(CatalogCommand::Import {
            path: path.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CommandError::QueueClosed)?
    }
}
