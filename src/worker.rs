use std::sync::mpsc::{sync_channel, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::diagnostics::{self, ErrorReport};
use crate::error::ActionError;
use crate::executor::ActionContext;
use crate::model::Action;

/// Single background thread running triggered actions one after another.
///
/// Submitting never blocks: when the queue is full the action is refused. Once an
/// action starts it runs to completion, there is no cancellation.
pub struct ActionWorker {
    tx: Option<SyncSender<Arc<Action>>>,
    handle: Option<JoinHandle<()>>,
}

impl ActionWorker {
    pub fn spawn(ctx: ActionContext, queue_size: usize) -> Self {
        let (tx, rx) = sync_channel::<Arc<Action>>(queue_size.max(1));

        let handle = thread::spawn(move || {
            while let Ok(action) = rx.recv() {
                log::info!("Worker: running {}", action.describe());
                match action.run(&ctx) {
                    Ok(()) => log::info!("Worker: finished {}", action.describe()),
                    Err(e) => {
                        let message = format!("{} failed: {}", action.describe(), e);
                        diagnostics::report(
                            ctx.errors.as_ref(),
                            &ctx.error_title,
                            ErrorReport::new(&message).logged_from("worker", "run"),
                        );
                    }
                }
            }
            log::debug!("Worker: queue closed");
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn submit(&self, action: Arc<Action>) -> Result<(), ActionError> {
        let tx = self.tx.as_ref().ok_or(ActionError::WorkerGone)?;
        match tx.try_send(action) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ActionError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(ActionError::WorkerGone),
        }
    }

    /// Closes the queue and waits until every queued action has run.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Worker: thread panicked");
            }
        }
    }
}

impl Drop for ActionWorker {
    fn drop(&mut self) {
        self.close();
    }
}
