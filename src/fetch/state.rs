//! Fetch lifecycle state machine
//!
//! Every retrieval gets a [`Ticket`] from [`FetchMachine::start_load`]. Only
//! the most recently issued ticket may move the machine forward; outcomes
//! carrying an older ticket are ignored, so a slow superseded request can
//! never overwrite a newer result.

use crate::contact::Contact;
use chrono::{DateTime, Local};
use std::mem;

/// User-facing text for any retrieval failure. The cause goes to the log.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch contacts. Please try again.";

/// Identity of one issued retrieval. Later retrievals compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    /// Mounted, nothing requested yet
    Idle,
    Loading,
    Success(Vec<Contact>),
    Error(String),
}

#[derive(Debug)]
pub struct FetchMachine {
    state: FetchState,
    /// Last successful list, kept visible while a reload runs or failed
    retained: Vec<Contact>,
    loading: bool,
    initial_loading: bool,
    issued: u64,
    query: String,
    updated_at: Option<DateTime<Local>>,
}

impl Default for FetchMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchMachine {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            retained: Vec::new(),
            loading: false,
            initial_loading: true,
            issued: 0,
            query: String::new(),
            updated_at: None,
        }
    }

    /// Issue a new retrieval for `query`, superseding any in flight.
    pub fn start_load(&mut self, query: &str) -> Ticket {
        self.issued += 1;
        if let FetchState::Success(list) = mem::replace(&mut self.state, FetchState::Loading) {
            self.retained = list;
        }
        self.loading = true;
        self.query = query.to_string();
        Ticket(self.issued)
    }

    /// Whether `ticket` is the most recently issued retrieval.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Store a result. Returns `false` and changes nothing for a stale ticket.
    pub fn succeed(&mut self, ticket: Ticket, contacts: Vec<Contact>) -> bool {
        if !self.is_current(ticket) || !self.loading {
            return false;
        }
        self.state = FetchState::Success(contacts);
        self.retained.clear();
        self.updated_at = Some(Local::now());
        true
    }

    /// Record a failure. Returns `false` and changes nothing for a stale
    /// ticket. The previous list stays retained; the error takes priority
    /// when rendering.
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) || !self.loading {
            return false;
        }
        self.state = FetchState::Error(message.into());
        true
    }

    /// Release the loading flags for `ticket`. Effective once, and only for
    /// the current ticket. A retrieval that reported no outcome counts as
    /// failed.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) || !self.loading {
            return false;
        }
        if self.state == FetchState::Loading {
            self.state = FetchState::Error(FETCH_FAILED_MESSAGE.to_string());
        }
        self.loading = false;
        self.initial_loading = false;
        true
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Rows to display: the current result, or the last one while reloading
    /// or after a failure.
    pub fn contacts(&self) -> &[Contact] {
        match &self.state {
            FetchState::Success(list) => list,
            _ => &self.retained,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True until the first retrieval since mount has finished.
    pub fn is_initial_loading(&self) -> bool {
        self.initial_loading
    }

    /// Query of the most recently issued retrieval.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn latest_ticket(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    /// When the last successful result was stored.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }
}
