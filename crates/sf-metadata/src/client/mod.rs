//! Metadata API client.

use busbar_sf_soap::{Fields, HttpTransport, Result, SoapTransport, TypedVariant, Value};

use crate::builder::MetadataClientBuilder;
use crate::dispatch::CallDispatcher;
use crate::events::CallListener;
use crate::marshal::{MetadataObject, ObjectMarshaller};
use crate::schema::TypeSchemaRegistry;
use crate::session::SessionManager;
use crate::ROOT_TYPE;

mod crud_sync;
mod deploy;
mod describe;
mod list;
mod retrieve;

/// Salesforce Metadata API client.
///
/// One method per remote operation. Each builds its parameters, marshals
/// metadata objects against the service's type schemas where needed, and
/// runs the operation through a [`CallDispatcher`]. Results are returned as
/// the decoded payload.
#[derive(Debug)]
pub struct MetadataClient<T = HttpTransport> {
    dispatcher: CallDispatcher<T>,
    marshaller: ObjectMarshaller,
}

impl MetadataClient<HttpTransport> {
    /// Start building a client over HTTP.
    pub fn builder() -> MetadataClientBuilder {
        MetadataClientBuilder::new()
    }
}

impl<T: SoapTransport> MetadataClient<T> {
    /// Create a client whose schemas come from the transport's type
    /// descriptors, merged over the `Metadata` root type.
    pub fn new(transport: T, session: SessionManager) -> Self {
        Self::with_root_type(transport, session, ROOT_TYPE)
    }

    /// Create a client with a custom root type.
    pub fn with_root_type(transport: T, session: SessionManager, root_type: &str) -> Self {
        let registry = TypeSchemaRegistry::new(root_type, transport.type_descriptors());
        Self {
            dispatcher: CallDispatcher::new(transport, session),
            marshaller: ObjectMarshaller::new(registry),
        }
    }

    /// Register a call listener.
    pub fn add_listener(&mut self, listener: impl CallListener + 'static) {
        self.dispatcher.add_listener(listener);
    }

    pub(crate) fn add_boxed_listener(&mut self, listener: Box<dyn CallListener>) {
        self.dispatcher.add_boxed_listener(listener);
    }

    pub fn session(&self) -> &SessionManager {
        self.dispatcher.session()
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        self.dispatcher.session_mut()
    }

    pub fn registry(&self) -> &TypeSchemaRegistry {
        self.marshaller.registry()
    }

    pub fn marshaller(&self) -> &ObjectMarshaller {
        &self.marshaller
    }

    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    /// Run an operation with raw parameters.
    pub async fn call(&mut self, operation: &str, params: Fields) -> Result<Value> {
        self.dispatcher.call(operation, params).await
    }

    fn variants<O: MetadataObject>(&self, metadata_type: &str, objects: &[O]) -> Vec<TypedVariant> {
        self.marshaller.create_variants([(metadata_type, objects)])
    }
}

/// Parameter list in the given order.
pub(crate) fn params<const N: usize>(entries: [(&str, Value); N]) -> Fields {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn names(full_names: impl IntoIterator<Item = impl Into<String>>) -> Value {
    Value::List(
        full_names
            .into_iter()
            .map(|name| Value::String(name.into()))
            .collect(),
    )
}
