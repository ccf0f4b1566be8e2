//! Query description for the contacts resource
//!
//! A [`ContactQuery`] is a small, backend-neutral request: projected columns,
//! an optional ordering, an optional free-text search and an optional limit.
//! [`ContactQuery::to_params`] renders it as PostgREST URL parameters and
//! [`ContactQuery::matches`] evaluates the search locally.

use crate::contact::Contact;

/// Columns a free-text search is matched against
pub const SEARCH_COLUMNS: [&str; 3] = ["name", "email", "company"];

/// Ordering clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    columns: String,
    order: Option<Order>,
    search: Option<String>,
    limit: Option<usize>,
}

impl ContactQuery {
    /// Start a query projecting `columns` (`"*"` for every column).
    pub fn select(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            order: None,
            search: None,
            limit: None,
        }
    }

    /// The directory listing: every column, by name ascending, filtered by
    /// `term` when it is non-empty.
    pub fn listing(term: &str) -> Self {
        Self::select("*").order("name", true).search(term)
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Require `term` as a case-insensitive substring of any of the
    /// [`SEARCH_COLUMNS`]. An empty term means no filter.
    ///
    /// PostgREST reads `*` inside `ilike` values as `%`, so a `*` in the term
    /// matches any run of characters on every source.
    pub fn search(mut self, term: &str) -> Self {
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn columns(&self) -> &str {
        &self.columns
    }

    pub fn ordering(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.limit
    }

    /// The comma-joined `column.ilike.%term%` clauses, or `None` without a
    /// search term.
    pub fn or_predicate(&self) -> Option<String> {
        let term = self.search.as_deref()?;
        let value = quote_value(&format!("%{}%", escape_like(term)));
        Some(
            SEARCH_COLUMNS
                .iter()
                .map(|column| format!("{}.ilike.{}", column, value))
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// PostgREST query-string parameters, unencoded.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order", format!("{}.{}", order.column, direction)));
        }
        if let Some(predicate) = self.or_predicate() {
            params.push(("or", format!("({})", predicate)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    /// Evaluate the search filter against a record.
    pub fn matches(&self, contact: &Contact) -> bool {
        let term = match &self.search {
            Some(term) => term.to_lowercase(),
            None => return true,
        };
        [&contact.name, &contact.email, &contact.company]
            .iter()
            .any(|field| contains_pattern(&field.to_lowercase(), &term))
    }
}

/// Substring test where `*` stands for any run of characters.
fn contains_pattern(haystack: &str, pattern: &str) -> bool {
    let mut rest = haystack;
    for piece in pattern.split('*') {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    true
}

/// Escape LIKE metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Double-quote a filter value when it holds characters PostgREST reserves
/// inside logic trees.
fn quote_value(value: &str) -> String {
    const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];
    if !value.contains(RESERVED) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Contact {
        Contact::new(1, "Jane Doe", "jane@example.com", "555-0100", "Acme Corp")
    }

    #[test]
    fn listing_without_term_has_no_filter() {
        let query = ContactQuery::listing("");
        assert_eq!(query.search_term(), None);
        assert_eq!(
            query.to_params(),
            vec![("select", "*".to_string()), ("order", "name.asc".to_string())]
        );
    }

    #[test]
    fn listing_with_term_renders_or_clause() {
        let query = ContactQuery::listing("acme");
        assert_eq!(
            query.or_predicate().unwrap(),
            "name.ilike.%acme%,email.ilike.%acme%,company.ilike.%acme%"
        );
        assert!(query
            .to_params()
            .contains(&("or", "(name.ilike.%acme%,email.ilike.%acme%,company.ilike.%acme%)".to_string())));
    }

    #[test]
    fn reserved_characters_are_quoted() {
        let query = ContactQuery::listing("doe, jane");
        assert_eq!(
            query.or_predicate().unwrap().split(".ilike.").nth(1).unwrap(),
            "\"%doe, jane%\",email"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let query = ContactQuery::listing("50%_off");
        // `\%` and `\_` force quoting, which doubles the backslashes.
        assert!(query
            .or_predicate()
            .unwrap()
            .starts_with(r#"name.ilike."%50\\%\\_off%""#));
    }

    #[test]
    fn probe_query_params() {
        let query = ContactQuery::select("id").limit(1);
        assert_eq!(
            query.to_params(),
            vec![("select", "id".to_string()), ("limit", "1".to_string())]
        );
    }

    #[test]
    fn matches_name_email_or_company_case_insensitively() {
        let contact = acme();
        assert!(ContactQuery::listing("ACME").matches(&contact));
        assert!(ContactQuery::listing("jane@").matches(&contact));
        assert!(ContactQuery::listing("doe").matches(&contact));
        assert!(ContactQuery::listing("").matches(&contact));
        // phone is not searched
        assert!(!ContactQuery::listing("555").matches(&contact));

        let other = Contact::new(2, "Bob", "bob@other.com", "", "Other Inc");
        assert!(!ContactQuery::listing("acme").matches(&other));
    }

    #[test]
    fn star_matches_any_run_like_the_rest_service() {
        let contact = acme();
        assert!(ContactQuery::listing("ac*corp").matches(&contact));
        assert!(ContactQuery::listing("jane*.com").matches(&contact));
        assert!(ContactQuery::listing("*").matches(&contact));
        assert!(!ContactQuery::listing("corp*acme").matches(&contact));

        // the star reaches the service unescaped
        assert!(ContactQuery::listing("ac*corp")
            .or_predicate()
            .unwrap()
            .starts_with("name.ilike.%ac*corp%"));
    }
}
