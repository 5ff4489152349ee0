//! # sf-soap
//!
//! SOAP wire layer for Salesforce APIs.
//!
//! This crate provides:
//! - [`Value`] - the value model for parameters, records and decoded payloads
//! - [`SoapTransport`] - the seam API clients call through
//! - [`HttpTransport`] - a reqwest-backed transport with login support
//! - [`WsdlDocument`] - type descriptors read from a service WSDL
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-metadata)                                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  SoapCall { operation, params, headers, endpoint }
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SoapTransport                            │
//! │  - login / invoke                                           │
//! │  - envelope encoding, fault decoding                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_soap::{HttpTransport, SoapTransport, TransportConfig, WsdlDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_soap::Error> {
//!     let wsdl = WsdlDocument::from_file("metadata.wsdl")?;
//!     let transport = HttpTransport::new(TransportConfig::default())?.with_wsdl(wsdl);
//!
//!     let login = transport.login("user@example.com", "passwordTOKEN").await?;
//!     println!("Metadata endpoint: {}", login.server_url);
//!     Ok(())
//! }
//! ```

mod config;
pub mod envelope;
mod error;
mod http;
mod transport;
mod value;
mod wsdl;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::{Error, ErrorKind, Result, SoapFault};
pub use http::HttpTransport;
pub use transport::{LoginResult, ResponseEnvelope, SoapCall, SoapHeader, SoapTransport};
pub use value::{Encoding, Fields, TypedVariant, Value};
pub use wsdl::WsdlDocument;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Metadata API namespace.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// Partner API namespace, used for `login`.
pub const PARTNER_NAMESPACE: &str = "urn:partner.soap.sforce.com";

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-api/", env!("CARGO_PKG_VERSION"));
