//! Fire-and-forget progress reporting
//!
//! The engine sends events into an unbounded channel so the presentation
//! surface can never apply backpressure. With no consumer attached,
//! events fall through to the logger.

use tokio::sync::mpsc;

use crate::sync::RunSummary;

/// One progress message from a sync run
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Human-readable status line
    Progress(String),
    /// Final event carrying the run summary; the channel closes after it
    Done(RunSummary),
}

/// Handle the engine reports through; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl Progress {
    /// Progress that forwards events to a consumer task
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Progress that routes everything to the logger
    pub fn logger() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, message: impl Into<String>) {
        let message = message.into();
        match &self.tx {
            // A dropped receiver is not the engine's problem
            Some(tx) => {
                let _ = tx.send(SyncEvent::Progress(message));
            }
            None => log::info!("{message}"),
        }
    }

    pub fn done(&self, summary: RunSummary) {
        match &self.tx {
            Some(tx) => {
                let _ = tx.send(SyncEvent::Done(summary));
            }
            None => log::info!("{summary}"),
        }
    }
}
