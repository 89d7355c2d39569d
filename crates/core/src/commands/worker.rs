use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use super::{CatalogCommand, CommandEnvelope, CommandError, CommandHandle};
use crate::import::ImportPipeline;
use crate::repository::CatalogRepository;

/// Background task that executes catalog commands one at a time.
pub struct CommandWorker {
    rx: mpsc::Receiver<CommandEnvelope>,
    repository: CatalogRepository,
    import: ImportPipeline,
}

impl CommandWorker {
    pub fn new(
        rx: mpsc::Receiver<CommandEnvelope>,
        repository: CatalogRepository,
        import: ImportPipeline,
    ) -> Self {
        Self {
            rx,
            repository,
            import,
        }
    }

    /// Run the worker until every handle has been dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        tracing::info!("Command worker started");

        while let Some(envelope) = self.rx.recv().await {
            self.execute(envelope).await;
        }

        tracing::info!("Command worker shutting down");
    }

    async fn execute(&self, envelope: CommandEnvelope) {
        let kind = envelope.command.kind();
        let queued_ms = (Utc::now() - envelope.submitted_at).num_milliseconds();

        if envelope.command.is_abandoned() {
            tracing::debug!(command = kind, queued_ms, "Skipping abandoned command");
            return;
        }

        tracing::debug!(command = kind, queued_ms, "Executing command");

        match envelope.command {
            CatalogCommand::Add { entry, reply } => {
                let repository = self.repository.clone();
                let result = blocking(kind, move || repository.insert(&entry)).await;
                respond(kind, reply, result);
            }
            CatalogCommand::Update { entry, reply } => {
                let repository = self.repository.clone();
                let result = blocking(kind, move || repository.update(&entry)).await;
                respond(kind, reply, result);
            }
            CatalogCommand::Delete { entry, reply } => {
                let repository = self.repository.clone();
                let result = blocking(kind, move || repository.delete(&entry)).await;
                respond(kind, reply, result);
            }
            CatalogCommand::Import { path, reply } => {
                let import = self.import.clone();
                let result = blocking(kind, move || import.import_file(&path)).await;
                respond(kind, reply, result);
            }
        }
    }
}

/// Run a storage call on the blocking pool. `None` if the call panicked.
async fn blocking<T, E, F>(kind: &'static str, f: F) -> Option<Result<T, CommandError>>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<CommandError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => Some(result.map_err(Into::into)),
        Err(e) => {
            tracing::error!(command = kind, error = %e, "Command execution failed");
            None
        }
    }
}

fn respond<T>(
    kind: &'static str,
    reply: oneshot::Sender<Result<T, CommandError>>,
    result: Option<Result<T, CommandError>>,
) {
    // Dropping the reply on panic surfaces as QueueClosed to the requester
    let Some(result) = result else {
        return;
    };

    if let Err(e) = &result {
        tracing::warn!(command = kind, error = %e, "Command failed");
    }

    if reply.send(result).is_err() {
        tracing::debug!(command = kind, "Requester went away before the result");
    }
}

/// Create a command queue.
///
/// Returns:
/// - `CommandHandle` - for submitting commands (clone this to share across tasks)
/// - `CommandWorker` - spawn this as a background task with `tokio::spawn(worker.run())`
pub fn create_command_queue(
    repository: CatalogRepository,
    import: ImportPipeline,
    buffer_size: usize,
) -> (CommandHandle, CommandWorker) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let handle = CommandHandle::new(tx);
    let worker = CommandWorker::new(rx, repository, import);
    (handle, worker)
}
