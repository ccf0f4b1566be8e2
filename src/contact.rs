//! Contact record as served by the `contacts` table

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the directory. Read-only from this crate's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub company: String,
}

impl Contact {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company: company.into(),
        }
    }
}

/// Text columns are nullable in the table; show them as empty cells.
fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
