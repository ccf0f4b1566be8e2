//! Search-driven fetch lifecycle

pub mod controller;
pub mod state;

pub use controller::{FetchCompletion, FetchController};
pub use state::{FetchMachine, FetchState, Ticket, FETCH_FAILED_MESSAGE};
