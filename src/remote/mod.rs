//! Remote contacts service
//!
//! The service is reached only through [`ContactSource`], so the fetch
//! controller and the diagnostics probe take an injected instance and tests
//! can substitute their own.

pub mod memory;
pub mod postgrest;
pub mod query;

pub use memory::MemorySource;
pub use postgrest::RestClient;
pub use query::{ContactQuery, Order, SEARCH_COLUMNS};

use crate::contact::Contact;
use crate::error::Result;

/// A queryable store of contacts.
///
/// Calls block; callers run them off the UI thread.
pub trait ContactSource: Send + Sync {
    /// Execute `query` and return the matching records in query order.
    fn fetch(&self, query: &ContactQuery) -> Result<Vec<Contact>>;

    /// Exact number of records in the resource, without transferring rows.
    /// `None` when the service does not report a total.
    fn count(&self) -> Result<Option<u64>>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
