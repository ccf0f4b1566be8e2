//! contactdir - terminal contact directory
//!
//! Lists the rows of a PostgREST `contacts` table (the Supabase REST surface),
//! filters them as you type, and shows whether the service is reachable.
//!
//! # Features
//!
//! - **Debounced search**: the query is sent once typing pauses
//! - **Latest result wins**: a slow, superseded request never overwrites a newer one
//! - **Loading states**: full-screen spinner on first load, inline one on reload
//! - **Diagnostics**: one-shot connection probe and exact row count
//! - **Offline fixtures**: serve contacts from a JSON file instead of the service
//!
//! # Example
//!
//! ```no_run
//! use contactdir::{AppConfig, FetchController, RestClient, ServiceConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! fn main() -> contactdir::Result<()> {
//!     let app = AppConfig::default();
//!     let client = RestClient::new(ServiceConfig::from_env()?, &app)?;
//!
//!     let mut fetch = FetchController::new(Arc::new(client));
//!     fetch.retrieve("acme");
//!     fetch.wait_until_settled(Duration::from_secs(30))?;
//!
//!     for contact in fetch.machine().contacts() {
//!         println!("{} <{}> {}", contact.name, contact.email, contact.company);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contact;
pub mod debounce;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod remote;
pub mod tui;
pub mod view;

// Re-export main types
pub use config::{AppConfig, ServiceConfig};
pub use contact::Contact;
pub use debounce::Debouncer;
pub use diagnostics::{ConnectionStatus, Diagnostics};
pub use error::{DirectoryError, Result};
pub use fetch::{FetchController, FetchMachine, FetchState, Ticket, FETCH_FAILED_MESSAGE};
pub use remote::{ContactQuery, ContactSource, MemorySource, RestClient};
pub use view::{Presentation, View};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
