//! PostgREST client for the contacts table
//!
//! Speaks the REST surface Supabase exposes under `/rest/v1`: the anon key
//! goes in both the `apikey` header and a bearer token, filters travel as
//! query parameters, and counts come back in `Content-Range`.

use crate::config::{AppConfig, ServiceConfig};
use crate::contact::Contact;
use crate::error::{DirectoryError, Result};
use crate::remote::{ContactQuery, ContactSource};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

const REST_PREFIX: &str = "rest/v1";

/// Blocking HTTP client bound to one table
pub struct RestClient {
    endpoint: Url,
    api_key: SecretString,
    http: Client,
}

impl RestClient {
    pub fn new(service: ServiceConfig, app: &AppConfig) -> Result<Self> {
        let endpoint = table_endpoint(&service.url, &app.table)?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10).min(app.request_timeout))
            .timeout(app.request_timeout)
            .user_agent(concat!("contactdir/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint,
            api_key: service.api_key,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        request
            .header("apikey", key)
            .header(AUTHORIZATION, format!("Bearer {}", key))
    }
}

impl ContactSource for RestClient {
    fn fetch(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
        let params = query.to_params();
        debug!(endpoint = %self.endpoint, ?params, "fetching contacts");

        let response = self
            .authorized(self.http.get(self.endpoint.clone()))
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()?;
        let response = check_status(response)?;

        let body = response.text()?;
        serde_json::from_str(&body)
            .map_err(|e| DirectoryError::DecodeError(format!("contact list: {}", e)))
    }

    fn count(&self) -> Result<Option<u64>> {
        let response = self
            .authorized(self.http.head(self.endpoint.clone()))
            .header("Prefer", "count=exact")
            .query(&[("select", "*")])
            .send()?;
        let response = check_status(response)?;

        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .ok_or_else(|| DirectoryError::DecodeError("missing Content-Range header".into()))?;
        let header = header
            .to_str()
            .map_err(|e| DirectoryError::DecodeError(format!("Content-Range: {}", e)))?;
        parse_content_range_total(header)
    }

    fn name(&self) -> &'static str {
        "postgrest"
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(DirectoryError::from_status(status.as_u16(), &body))
}

/// `{base}/rest/v1/{table}`, tolerating a base URL with or without a
/// trailing slash or path.
fn table_endpoint(base: &Url, table: &str) -> Result<Url> {
    if table.is_empty() || table.contains('/') {
        return Err(DirectoryError::InvalidConfig {
            key: "table",
            reason: format!("'{}' is not a table name", table),
        });
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("{}/{}", REST_PREFIX, table))
        .map_err(|e| DirectoryError::InvalidConfig {
            key: "table",
            reason: e.to_string(),
        })
}

/// Total from a `Content-Range` value such as `0-24/573` or `*/573`.
/// A `*` total means the server did not count.
pub fn parse_content_range_total(header: &str) -> Result<Option<u64>> {
    let total = header
        .rsplit_once('/')
        .map(|(_, total)| total.trim())
        .ok_or_else(|| DirectoryError::DecodeError(format!("Content-Range '{}'", header)))?;
    if total == "*" {
        return Ok(None);
    }
    total
        .parse::<u64>()
        .map(Some)
        .map_err(|_| DirectoryError::DecodeError(format!("Content-Range '{}'", header)))
}
