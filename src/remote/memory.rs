//! In-process contact source backed by a JSON fixture

use crate::contact::Contact;
use crate::error::{DirectoryError, Result};
use crate::remote::{ContactQuery, ContactSource};
use std::cmp::Ordering;
use std::path::Path;

/// Serves a fixed set of records with the same filter and ordering rules as
/// the remote service.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    contacts: Vec<Contact>,
}

impl MemorySource {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Load a JSON array of contact objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let contacts: Vec<Contact> = serde_json::from_str(&text)?;
        Ok(Self::new(contacts))
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl ContactSource for MemorySource {
    fn fetch(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
        let mut rows: Vec<Contact> = self
            .contacts
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();

        if let Some(order) = query.ordering() {
            let column = order.column.as_str();
            if !matches!(column, "id" | "name" | "email" | "phone" | "company") {
                return Err(DirectoryError::from_status(
                    400,
                    &format!(r#"{{"message":"column contacts.{} does not exist"}}"#, column),
                ));
            }
            // Ties fall back to id so repeated fetches list rows identically.
            rows.sort_by(|a, b| {
                let ord = compare_column(a, b, column).then_with(|| a.id.cmp(&b.id));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if let Some(limit) = query.max_rows() {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn count(&self) -> Result<Option<u64>> {
        Ok(Some(self.contacts.len() as u64))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Text columns compare case-insensitively, closer to a database collation
/// than byte order.
fn compare_column(a: &Contact, b: &Contact, column: &str) -> Ordering {
    let text = |x: &str, y: &str| x.to_lowercase().cmp(&y.to_lowercase());
    match column {
        "id" => a.id.cmp(&b.id),
        "email" => text(&a.email, &b.email),
        "phone" => text(&a.phone, &b.phone),
        "company" => text(&a.company, &b.company),
        _ => text(&a.name, &b.name),
    }
}
