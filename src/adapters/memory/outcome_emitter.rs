//! Outcome emitter that records emissions for inspection.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::ports::{CollaboratorError, OutcomeEmitter};

/// A denial as the host would have received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedDenial {
    pub summary: String,
    pub reasons: Vec<String>,
}

/// Keeps every emitted denial in memory.
#[derive(Debug, Default)]
pub struct RecordingOutcomeEmitter {
    emitted: RwLock<Vec<EmittedDenial>>,
    force_error: RwLock<Option<CollaboratorError>>,
}

impl RecordingOutcomeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the denial and then fails with `error`.
    pub fn with_error(self, error: CollaboratorError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn emitted(&self) -> Vec<EmittedDenial> {
        self.emitted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn emit_count(&self) -> usize {
        self.emitted.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl OutcomeEmitter for RecordingOutcomeEmitter {
    async fn emit_deny(&self, summary: &str, reasons: &[String]) -> Result<(), CollaboratorError> {
        self.emitted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmittedDenial {
                summary: summary.to_string(),
                reasons: reasons.to_vec(),
            });

        match self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
