//! Error and result types shared across the crate.
//!
//! Library code returns [`Result`]; the binary and the event loop wrap these in
//! `anyhow` at the top level.

use thiserror::Error;

/// Failures surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with something other than 200.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// The body was not a JSON array of user records.
    #[error("could not decode user records: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Another error wrapped with a human readable context line.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a context message to a failing result.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}

impl Error {
    /// Shorthand used by the config parsers.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_message_and_keeps_source() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = res.with_ctx(|| "reading userlist.conf".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "reading userlist.conf: io error: gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn status_error_mentions_url_and_code() {
        let err = Error::Status {
            url: "http://localhost/users".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/users answered with status 503"
        );
    }
}
