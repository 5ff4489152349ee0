//! The transport seam between API clients and a SOAP engine.

use crate::error::Result;
use crate::value::{Fields, Value};

/// A SOAP header block, e.g. `SessionHeader { sessionId }`.
#[derive(Clone, PartialEq)]
pub struct SoapHeader {
    pub namespace: String,
    pub name: String,
    pub fields: Fields,
}

impl SoapHeader {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, fields: Fields) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            fields,
        }
    }
}

// Header fields carry session ids; only names are printed.
impl std::fmt::Debug for SoapHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapHeader")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One outgoing remote operation.
#[derive(Debug, Clone, Copy)]
pub struct SoapCall<'a> {
    /// Remote operation name, also sent as the SOAPAction.
    pub operation: &'a str,
    /// Operation parameters, encoded in order as children of the operation element.
    pub params: &'a Fields,
    /// Header blocks attached to the call.
    pub headers: &'a [SoapHeader],
    /// Endpoint override; the transport's default endpoint is used when `None`.
    pub endpoint: Option<&'a str>,
}

/// A decoded response envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    /// The `result` payload, absent for operations that return nothing.
    pub result: Option<Value>,
}

impl ResponseEnvelope {
    pub fn new(result: impl Into<Value>) -> Self {
        Self {
            result: Some(result.into()),
        }
    }

    /// An envelope without a result payload.
    pub fn empty() -> Self {
        Self { result: None }
    }
}

/// Result of a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub session_id: String,
    /// Endpoint subsequent calls must target.
    pub server_url: String,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_id", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .finish()
    }
}

/// A SOAP engine able to log in and invoke remote operations.
///
/// Implementations own connection handling, XML encoding and transport-level
/// retries. A fault answered by the service is returned as an error whose
/// kind is [`ErrorKind::SoapFault`](crate::ErrorKind::SoapFault).
#[allow(async_fn_in_trait)]
pub trait SoapTransport {
    /// Textual type descriptors of the service, one `struct <Name> { ... }`
    /// block per complex type.
    fn type_descriptors(&self) -> Vec<String>;

    /// Authenticate with a username and a password (security token appended).
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult>;

    /// Invoke one remote operation and wait for its response.
    async fn invoke(&self, call: SoapCall<'_>) -> Result<ResponseEnvelope>;
}
