//! Transport configuration.

use std::time::Duration;

/// Configuration for the HTTP SOAP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Login host, e.g. `https://login.salesforce.com`.
    pub login_url: String,
    /// API version used for the login and default metadata endpoints.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            login_url: crate::PRODUCTION_LOGIN_URL.to_string(),
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Create a new transport config builder.
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }

    /// Partner SOAP endpoint used for `login`.
    pub fn login_endpoint(&self) -> String {
        format!(
            "{}/services/Soap/u/{}",
            self.login_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Metadata SOAP endpoint on the login host, used until a login or WSDL
    /// provides a better one.
    pub fn metadata_endpoint(&self) -> String {
        format!(
            "{}/services/Soap/m/{}",
            self.login_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Builder for TransportConfig.
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the login host.
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.config.login_url = login_url.into();
        self
    }

    /// Use the sandbox login host.
    pub fn sandbox(self) -> Self {
        self.with_login_url(crate::SANDBOX_LOGIN_URL)
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the transport configuration.
    pub fn build(self) -> TransportConfig {
        self.config
    }
}
