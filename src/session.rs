// # Pick Session
//
// Per-surface slot for the one transfer task the surface is waiting on.
// Every `bind` opens a new generation; a task only reports back if its
// generation is still current when it finishes and the session still
// exists. Older tasks keep running but their outcome is dropped.

use crate::error::TransferOutcome;
use crate::task::TransferTask;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No callback bound: call bind() before start()")]
    Unbound,
}

type TerminalCallback<T> = Box<dyn FnOnce(TransferOutcome<T>) + Send>;

struct SessionState<T> {
    generation: u64,
    callback: Option<TerminalCallback<T>>,
    pending: bool,
}

pub struct PickSession<T> {
    state: Arc<Mutex<SessionState<T>>>,
}

fn lock<T>(state: &Mutex<SessionState<T>>) -> MutexGuard<'_, SessionState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Send + 'static> PickSession<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                generation: 0,
                callback: None,
                pending: false,
            })),
        }
    }

    /// Register the handler for the next task's outcome.
    /// Any task started earlier on this session is superseded.
    pub fn bind<F>(&self, on_terminal: F)
    where
        F: FnOnce(TransferOutcome<T>) + Send + 'static,
    {
        let mut state = lock(&self.state);
        if state.pending {
            debug!(
                "Pick session generation {} superseded before it finished",
                state.generation
            );
        }
        state.generation += 1;
        state.callback = Some(Box::new(on_terminal));
        state.pending = false;
    }

    /// Wait for `task` in the background and hand its outcome to the bound
    /// callback. Needs a tokio runtime.
    pub fn start(&self, task: TransferTask<T>) -> Result<(), SessionError> {
        let (generation, callback) = {
            let mut state = lock(&self.state);
            let callback = state.callback.take().ok_or(SessionError::Unbound)?;
            state.pending = true;
            (state.generation, callback)
        };

        let session = Arc::downgrade(&self.state);
        tokio::spawn(deliver(session, generation, task, callback));
        Ok(())
    }

    /// True while a started task has not reported back
    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending
    }
}

async fn deliver<T>(
    session: Weak<Mutex<SessionState<T>>>,
    generation: u64,
    task: TransferTask<T>,
    callback: TerminalCallback<T>,
) {
    let outcome = task.await;

    let Some(state) = session.upgrade() else {
        debug!("Pick session closed, dropping outcome");
        return;
    };
    {
        let mut state = lock(&state);
        if state.generation != generation {
            debug!(
                "Dropping outcome of superseded pick (generation {}, current {})",
                generation, state.generation
            );
            return;
        }
        state.pending = false;
    }
    drop(state);

    callback(outcome);
}

impl<T: Send + 'static> Default for PickSession<T> {
    fn default() -> Self {
        Self::new()
    }
}
