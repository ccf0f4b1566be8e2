//! Retrieval orchestration
//!
//! [`FetchController`] owns a [`FetchMachine`] and runs each retrieval on a
//! worker thread. Workers report through a channel that the owner drains with
//! [`FetchController::pump`], so the machine is only ever touched from the
//! owning thread.

use crate::contact::Contact;
use crate::error::{DirectoryError, Result};
use crate::fetch::state::{FetchMachine, Ticket, FETCH_FAILED_MESSAGE};
use crate::remote::{ContactQuery, ContactSource};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Outcome of one retrieval, as reported by its worker
pub struct FetchCompletion {
    pub ticket: Ticket,
    pub query: String,
    pub outcome: Result<Vec<Contact>>,
}

/// Reports a worker's outcome exactly once. If the worker unwinds or is never
/// started, `Drop` reports [`DirectoryError::WorkerLost`] instead.
struct CompletionGuard {
    ticket: Ticket,
    query: String,
    tx: Sender<FetchCompletion>,
    reported: bool,
}

impl CompletionGuard {
    fn complete(mut self, outcome: Result<Vec<Contact>>) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: Result<Vec<Contact>>) {
        self.reported = true;
        // The controller may be gone already (teardown); nothing to update then.
        let _ = self.tx.send(FetchCompletion {
            ticket: self.ticket,
            query: std::mem::take(&mut self.query),
            outcome,
        });
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.reported {
            self.send(Err(DirectoryError::WorkerLost));
        }
    }
}

pub struct FetchController {
    source: Arc<dyn ContactSource>,
    machine: FetchMachine,
    tx: Sender<FetchCompletion>,
    rx: Receiver<FetchCompletion>,
}

impl FetchController {
    pub fn new(source: Arc<dyn ContactSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            machine: FetchMachine::new(),
            tx,
            rx,
        }
    }

    pub fn machine(&self) -> &FetchMachine {
        &self.machine
    }

    /// Start retrieving the listing for `query`. Any retrieval still in
    /// flight keeps running but its result will be discarded.
    pub fn retrieve(&mut self, query: &str) -> Ticket {
        let ticket = self.machine.start_load(query);
        debug!(ticket = ticket.id(), query, source = self.source.name(), "retrieve");

        let guard = CompletionGuard {
            ticket,
            query: query.to_string(),
            tx: self.tx.clone(),
            reported: false,
        };
        let source = Arc::clone(&self.source);

        let spawned = thread::Builder::new()
            .name(format!("contact-fetch-{}", ticket.id()))
            .spawn(move || {
                let listing = ContactQuery::listing(&guard.query);
                let outcome = source.fetch(&listing);
                guard.complete(outcome);
            });
        // On spawn failure the closure is dropped and its guard reports.
        if let Err(e) = spawned {
            warn!(error = %e, "could not start fetch worker");
        }

        ticket
    }

    /// Re-run the current query. Only available after a failure.
    pub fn retry(&mut self) -> Option<Ticket> {
        self.machine.error()?;
        let query = self.machine.query().to_string();
        Some(self.retrieve(&query))
    }

    /// Apply every completion that has arrived. Returns whether the visible
    /// state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Block until the latest retrieval has finished.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while self.machine.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(RecvTimeoutError::Timeout) => return Err(DirectoryError::Timeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => return Err(DirectoryError::WorkerLost),
            }
        }
        Ok(())
    }

    fn apply(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion {
            ticket,
            query,
            outcome,
        } = completion;

        let applied = match outcome {
            Ok(contacts) => {
                let count = contacts.len();
                let applied = self.machine.succeed(ticket, contacts);
                if applied {
                    debug!(ticket = ticket.id(), %query, count, "contacts loaded");
                }
                applied
            }
            Err(e) => {
                error!(ticket = ticket.id(), %query, error = %e, "Error fetching contacts");
                self.machine.fail(ticket, FETCH_FAILED_MESSAGE)
            }
        };
        let released = self.machine.finish(ticket);

        if !applied && !released {
            debug!(ticket = ticket.id(), %query, "discarded superseded result");
        }
        applied || released
    }
}
