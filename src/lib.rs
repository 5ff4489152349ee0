//! # busbar-sf-api
//!
//! A Salesforce Metadata API client library for Rust.
//!
//! Metadata objects are marshalled against the field types the service
//! declares, sessions are established lazily, and every call reports its
//! request, response or fault to registered listeners.
//!
//! ## Security
//!
//! - Passwords, security tokens and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Crates
//!
//! - **busbar-sf-soap** - SOAP wire layer: value model, envelope codec, WSDL reader, HTTP transport
//! - **busbar-sf-metadata** - Metadata API: schemas, marshalling, sessions, call events, operations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_api::{ListMetadataQuery, LoginCredentials, MetadataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = MetadataClient::builder()
//!         .with_credentials(LoginCredentials::from_env()?)
//!         .with_wsdl_file("metadata.wsdl")
//!         .build()?;
//!
//!     let classes = client
//!         .list_metadata(&[ListMetadataQuery::new("ApexClass")], None)
//!         .await?;
//!
//!     for class in classes.items() {
//!         println!("{:?}", class.get("fullName"));
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "metadata")]
pub use busbar_sf_metadata as metadata;
#[cfg(feature = "soap")]
pub use busbar_sf_soap as soap;

// Re-export commonly used types at the top level
#[cfg(feature = "metadata")]
pub use busbar_sf_metadata::{
    DeployArchive, DeployOptions, ListMetadataQuery, LoginCredentials, MetadataClient,
    MetadataClientBuilder, PackageOptions, PackageTypeMembers, RetrieveRequest,
};
#[cfg(feature = "soap")]
pub use busbar_sf_soap::{Error, ErrorKind, HttpTransport, Result, TransportConfig, Value};
