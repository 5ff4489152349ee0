//! # busbar-sf-metadata
//!
//! Salesforce Metadata API client with schema-directed marshalling.
//!
//! ## Features
//!
//! - **Type schemas** - Field types read from the service's type descriptors,
//!   with the `Metadata` root type's fields merged into every type
//! - **Marshalling** - Dates, date-times and binary fields converted to their
//!   wire forms; undeclared fields dropped
//! - **Sessions** - Lazy login, or an externally supplied session
//! - **Call events** - Request/response/fault notifications per call
//! - **Operations** - CRUD, deploy, retrieve, list and describe
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_metadata::{DeployOptions, LoginCredentials, MetadataClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_metadata::Error> {
//!     let mut client = MetadataClient::builder()
//!         .with_credentials(LoginCredentials::from_env()?)
//!         .with_wsdl_file("metadata.wsdl")
//!         .with_tracing()
//!         .build()?;
//!
//!     // Create a custom label
//!     let label = json!({"fullName": "Greeting", "value": "Hello", "language": "en_US",
//!                        "protected": false, "shortDescription": "Greeting"});
//!     client.create_metadata("CustomLabel", &[label]).await?;
//!
//!     // Deploy a package from disk
//!     let result = client
//!         .deploy(std::path::Path::new("package.zip"), &DeployOptions::default())
//!         .await?;
//!     println!("Deploy id: {:?}", result.get("id"));
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod deploy;
mod dispatch;
mod events;
mod list;
mod marshal;
mod retrieve;
mod schema;
mod session;

#[cfg(test)]
mod testing;

pub use builder::MetadataClientBuilder;
pub use client::MetadataClient;
pub use deploy::{DeployArchive, DeployOptions, TestLevel};
pub use dispatch::CallDispatcher;
pub use events::{CallEvent, CallListener, RequestEvent, TracingListener};
pub use list::ListMetadataQuery;
pub use marshal::{MetadataObject, MetadataRecord, ObjectMarshaller, ID_FIELD};
pub use retrieve::{PackageOptions, PackageTypeMembers, RetrieveRequest};
pub use schema::{TypeSchema, TypeSchemaRegistry};
pub use session::{LoginCredentials, SessionManager};

pub use busbar_sf_soap::{
    Error, ErrorKind, Fields, HttpTransport, Result, SoapFault, SoapTransport, TransportConfig,
    TypedVariant, Value, DEFAULT_API_VERSION, METADATA_NAMESPACE,
};

/// Root type whose fields every metadata type inherits.
pub const ROOT_TYPE: &str = "Metadata";

/// Name of the session header block.
pub const SESSION_HEADER: &str = "SessionHeader";
