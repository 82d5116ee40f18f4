//! Where user records come from.
//!
//! The application only ever reads: one GET to the configured endpoint, which
//! must answer 200 with a JSON array of user records.

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{Error, Result};
use crate::records::UserRecord;

/// Anything able to produce the full list of user records.
pub trait RecordSource {
    fn fetch(&self) -> Result<Vec<UserRecord>>;

    /// Short human readable description for logs and the title bar.
    fn describe(&self) -> String;
}

/// Fetches records with a blocking HTTP GET.
pub struct HttpSource {
    endpoint: String,
    client: Client,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Transport {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self { endpoint, client })
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self) -> Result<Vec<UserRecord>> {
        let transport = |source| Error::Transport {
            url: self.endpoint.clone(),
            source,
        };
        let response = self.client.get(&self.endpoint).send().map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(transport)?;
        parse_records(&body)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Decode a response body into records, keeping the order of the array.
pub fn parse_records(body: &str) -> Result<Vec<UserRecord>> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_in_order() {
        let body = r#"[
            {"id": 2, "name": "Bea", "email": "bea@example.com", "role": "admin"},
            {"id": 1, "name": "Al", "email": "al@example.com", "role": "member"}
        ]"#;
        let records = parse_records(body).unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(records[0].role, "admin");
    }

    #[test]
    fn rejects_non_array_body() {
        let err = parse_records(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_record_without_id() {
        assert!(parse_records(r#"[{"name": "x"}]"#).is_err());
    }

    #[test]
    fn string_ids_are_rejected() {
        assert!(parse_records(r#"[{"id": "1"}]"#).is_err());
    }
}
