//! Construction of a [`MetadataClient`].

use std::path::PathBuf;

use busbar_sf_soap::{
    Error, ErrorKind, HttpTransport, Result, SoapTransport, TransportConfig, WsdlDocument,
};
use tracing::debug;

use crate::client::MetadataClient;
use crate::events::{CallListener, TracingListener};
use crate::session::{LoginCredentials, SessionManager};
use crate::ROOT_TYPE;

#[derive(Debug, Clone)]
enum WsdlSource {
    Text(String),
    File(PathBuf),
}

/// Builder for [`MetadataClient`].
///
/// Either credentials or an external session are required. With an
/// external session no login happens until the session is invalidated.
pub struct MetadataClientBuilder {
    credentials: Option<LoginCredentials>,
    wsdl: Option<WsdlSource>,
    config: TransportConfig,
    root_type: String,
    listeners: Vec<Box<dyn CallListener>>,
    session: Option<(String, Option<String>)>,
}

impl std::fmt::Debug for MetadataClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClientBuilder")
            .field("credentials", &self.credentials)
            .field("wsdl", &self.wsdl)
            .field("config", &self.config)
            .field("root_type", &self.root_type)
            .field("listeners", &self.listeners.len())
            .field("session", &self.session.as_ref().map(|(_, endpoint)| endpoint))
            .finish()
    }
}

impl Default for MetadataClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataClientBuilder {
    pub fn new() -> Self {
        Self {
            credentials: None,
            wsdl: None,
            config: TransportConfig::default(),
            root_type: ROOT_TYPE.to_string(),
            listeners: Vec::new(),
            session: None,
        }
    }

    pub fn with_credentials(mut self, credentials: LoginCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Username, password and security token.
    pub fn with_login(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        self.with_credentials(LoginCredentials::new(username, password, security_token))
    }

    /// Metadata API WSDL text.
    pub fn with_wsdl(mut self, wsdl: impl Into<String>) -> Self {
        self.wsdl = Some(WsdlSource::Text(wsdl.into()));
        self
    }

    /// Path of a Metadata API WSDL file.
    pub fn with_wsdl_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.wsdl = Some(WsdlSource::File(path.into()));
        self
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Type whose fields are merged into every other type's schema.
    pub fn with_root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }

    pub fn with_listener(mut self, listener: impl CallListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Log every call through [`TracingListener`].
    pub fn with_tracing(self) -> Self {
        self.with_listener(TracingListener)
    }

    /// Use an existing session instead of logging in.
    pub fn with_session(
        mut self,
        session_id: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        self.session = Some((session_id.into(), Some(endpoint.into())));
        self
    }

    /// Build a client over an [`HttpTransport`].
    pub fn build(mut self) -> Result<MetadataClient<HttpTransport>> {
        let mut transport = HttpTransport::new(self.config.clone())?;
        match self.wsdl.take() {
            Some(WsdlSource::Text(xml)) => {
                transport = transport.with_wsdl(WsdlDocument::parse(&xml)?);
            }
            Some(WsdlSource::File(path)) => {
                debug!(path = %path.display(), "Loading WSDL");
                transport = transport.with_wsdl(WsdlDocument::from_file(&path)?);
            }
            None => {}
        }
        self.build_with_transport(transport)
    }

    /// Build a client over any transport.
    pub fn build_with_transport<T: SoapTransport>(self, transport: T) -> Result<MetadataClient<T>> {
        let session = match (self.session, self.credentials) {
            (Some((session_id, endpoint)), credentials) => {
                let session = SessionManager::with_session(session_id, endpoint);
                match credentials {
                    Some(credentials) => session.with_credentials(credentials),
                    None => session,
                }
            }
            (None, Some(credentials)) => SessionManager::new(credentials),
            (None, None) => {
                return Err(Error::new(ErrorKind::Config(
                    "Credentials or an existing session are required".to_string(),
                )))
            }
        };

        let mut client = MetadataClient::with_root_type(transport, session, &self.root_type);
        for listener in self.listeners {
            client.add_boxed_listener(listener);
        }
        Ok(client)
    }
}
