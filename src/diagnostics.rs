//! Connection diagnostics
//!
//! A one-shot probe run once per mount: can the contacts resource be read at
//! all, and if so how many rows does it hold. Failures are logged and shown
//! as status; they never reach the contact list.

use crate::remote::{ContactQuery, ContactSource};
use crossbeam_channel::{bounded, Receiver};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Failed,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Checking...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Diagnostics {
    pub status: ConnectionStatus,
    pub contact_count: Option<u64>,
}

/// Read a single id to check the service answers.
pub fn probe(source: &dyn ContactSource) -> ConnectionStatus {
    match source.fetch(&ContactQuery::select("id").limit(1)) {
        Ok(_) => {
            info!(source = source.name(), "connection successful");
            ConnectionStatus::Connected
        }
        Err(e) => {
            error!(source = source.name(), error = %e, "connection failed");
            ConnectionStatus::Failed
        }
    }
}

/// Probe, then count when connected.
pub fn run(source: &dyn ContactSource) -> Diagnostics {
    let status = probe(source);
    let contact_count = if status == ConnectionStatus::Connected {
        match source.count() {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "Error fetching contact count");
                None
            }
        }
    } else {
        None
    };
    Diagnostics {
        status,
        contact_count,
    }
}

/// Run the diagnostics on a background thread; the result arrives once on
/// the returned channel.
pub fn spawn(source: Arc<dyn ContactSource>) -> Receiver<Diagnostics> {
    let (tx, rx) = bounded(1);
    let spawned = thread::Builder::new()
        .name("contact-diagnostics".into())
        .spawn(move || {
            let _ = tx.send(run(source.as_ref()));
        });
    if let Err(e) = spawned {
        error!(error = %e, "could not start diagnostics probe");
    }
    rx
}
