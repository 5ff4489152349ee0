//! Error types for sf-soap.

use serde::{Deserialize, Serialize};

/// Result type alias for SOAP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for SOAP operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Create an error from a SOAP fault returned by the remote service.
    pub fn fault(fault_code: impl Into<String>, fault_string: impl Into<String>) -> Self {
        Self::new(ErrorKind::SoapFault(SoapFault {
            fault_code: fault_code.into(),
            fault_string: fault_string.into(),
        }))
    }

    /// Returns true if the remote service answered with a SOAP fault.
    pub fn is_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::SoapFault(_))
    }

    /// Returns the SOAP fault carried by this error, if any.
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match &self.kind {
            ErrorKind::SoapFault(fault) => Some(fault),
            _ => None,
        }
    }

    /// Returns true if the fault reports an expired or unknown session.
    pub fn is_invalid_session(&self) -> bool {
        self.as_fault()
            .is_some_and(|f| f.fault_code.ends_with("INVALID_SESSION_ID"))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The remote operation failed with a SOAP fault.
    #[error("{0}")]
    SoapFault(SoapFault),

    /// HTTP request failed without a SOAP fault body.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// XML could not be parsed.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Response parsed but did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// SOAP fault from a Salesforce SOAP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SOAP Fault: {} - {}", self.fault_code, self.fault_string)
    }
}

impl std::error::Error for SoapFault {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::with_source(ErrorKind::Parse(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}
