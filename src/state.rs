use std::sync::{Arc, Mutex, PoisonError};

use crate::error::AppError;
use crate::services::{AnswerLedger, AttendanceLog, QuestionRegistry, ScoreBook};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: QuestionRegistry,
    pub ledger: AnswerLedger,
    pub attendance: AttendanceLog,
    pub scores: ScoreBook,

    /// Held for the whole of every action run through [`AppState::run`].
    actions: Arc<Mutex<()>>,
}

impl AppState {
    /// Wires every component to the same store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let ledger = AnswerLedger::new(store.clone());
        let registry = QuestionRegistry::new(store.clone(), ledger.clone());
        let attendance = AttendanceLog::new(store.clone());
        let scores = ScoreBook::new(store);
        Self {
            registry,
            ledger,
            attendance,
            scores,
            actions: Arc::new(Mutex::new(())),
        }
    }

    /// Runs one user action to completion before the next one starts.
    ///
    /// The action executes on the blocking pool, since the core is synchronous
    /// and the file store does blocking I/O.
    pub async fn run<T, F>(&self, action: F) -> Result<T, AppError>
    where
        F: FnOnce(&AppState) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || {
            // The guarded value is `()`, so a panicked action leaves nothing to repair.
            let _guard = state.actions.lock().unwrap_or_else(PoisonError::into_inner);
            action(&state)
        })
        .await
        .map_err(|e| {
            tracing::error!("Action did not complete: {:?}", e);
            AppError::Storage(format!("action did not complete: {}", e))
        })?
    }
}
