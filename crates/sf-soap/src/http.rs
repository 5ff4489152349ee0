//! HTTP SOAP transport built on reqwest.

use reqwest::header::{HeaderName, CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::config::TransportConfig;
use crate::envelope;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::{LoginResult, ResponseEnvelope, SoapCall, SoapTransport};
use crate::value::{Fields, Value};
use crate::wsdl::WsdlDocument;

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// SOAP transport posting envelopes over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    config: TransportConfig,
    namespace: String,
    descriptors: Vec<String>,
    default_endpoint: String,
}

impl HttpTransport {
    /// Create a transport for the Metadata API namespace.
    pub fn new(config: TransportConfig) -> Result<Self> {
        url::Url::parse(&config.login_url)?;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            default_endpoint: config.metadata_endpoint(),
            namespace: crate::METADATA_NAMESPACE.to_string(),
            descriptors: Vec::new(),
            config,
        })
    }

    /// Use the type descriptors and service address of a WSDL document.
    pub fn with_wsdl(mut self, wsdl: WsdlDocument) -> Self {
        self.descriptors = wsdl.descriptors;
        if let Some(endpoint) = wsdl.endpoint {
            self.default_endpoint = endpoint;
        }
        self
    }

    /// Use explicit type descriptors.
    pub fn with_type_descriptors(mut self, descriptors: Vec<String>) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Set the namespace of operation elements.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the endpoint used for calls without an override.
    pub fn with_default_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.default_endpoint = endpoint.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.inner = client;
        self
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Endpoint used for calls without an override.
    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    async fn post(&self, url: &str, action: &str, body: String) -> Result<ResponseEnvelope> {
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, "text/xml;charset=UTF-8")
            .header(SOAP_ACTION_HEADER.clone(), action)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(
            status = status.as_u16(),
            content_length = text.len(),
            "Response received"
        );

        // Faults arrive with HTTP 500; anything else non-2xx is a transport error.
        match envelope::decode_response(&text) {
            Ok(envelope) if status.is_success() => Ok(envelope),
            Err(err) if err.is_fault() || status.is_success() => Err(err),
            _ => Err(Error::new(ErrorKind::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            })),
        }
    }
}

impl SoapTransport for HttpTransport {
    fn type_descriptors(&self) -> Vec<String> {
        self.descriptors.clone()
    }

    #[instrument(skip_all)]
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        let mut params = Fields::new();
        params.insert("username".to_string(), Value::from(username));
        params.insert("password".to_string(), Value::from(password));

        let body = envelope::encode_request(
            crate::PARTNER_NAMESPACE,
            &SoapCall {
                operation: "login",
                params: &params,
                headers: &[],
                endpoint: None,
            },
        );

        let endpoint = self.config.login_endpoint();
        debug!(endpoint, "Logging in");
        let envelope = self.post(&endpoint, "login", body).await?;

        let result = envelope.result.ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "No result in login response".to_string(),
            ))
        })?;

        let session_id = result
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::new(ErrorKind::InvalidResponse(
                    "No sessionId in login response".to_string(),
                ))
            })?
            .to_string();

        // The metadata service lives on its own URL on the same instance.
        let server_url = result
            .get("metadataServerUrl")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .or_else(|| result.get("serverUrl").and_then(Value::as_str))
            .ok_or_else(|| {
                Error::new(ErrorKind::InvalidResponse(
                    "No server URL in login response".to_string(),
                ))
            })?
            .to_string();

        Ok(LoginResult {
            session_id,
            server_url,
        })
    }

    #[instrument(skip(self, call), fields(operation = call.operation))]
    async fn invoke(&self, call: SoapCall<'_>) -> Result<ResponseEnvelope> {
        let endpoint = call.endpoint.unwrap_or(&self.default_endpoint);
        let body = envelope::encode_request(&self.namespace, &call);
        self.post(endpoint, call.operation, body).await
    }
}
