//! Session state for the Metadata API.

use busbar_sf_soap::{Error, ErrorKind, Fields, Result, SoapHeader, SoapTransport, Value};
use tracing::debug;

use crate::SESSION_HEADER;

/// Username/password credentials for a SOAP login.
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: String,
    security_token: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .finish()
    }
}

impl LoginCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Required:
    /// - `SF_USERNAME` or `SALESFORCE_USERNAME`
    /// - `SF_PASSWORD` or `SALESFORCE_PASSWORD`
    ///
    /// Optional:
    /// - `SF_SECURITY_TOKEN` or `SALESFORCE_SECURITY_TOKEN` (default: empty)
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("SF_USERNAME")
            .or_else(|_| std::env::var("SALESFORCE_USERNAME"))
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;

        let password = std::env::var("SF_PASSWORD")
            .or_else(|_| std::env::var("SALESFORCE_PASSWORD"))
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;

        let security_token = std::env::var("SF_SECURITY_TOKEN")
            .or_else(|_| std::env::var("SALESFORCE_SECURITY_TOKEN"))
            .unwrap_or_default();

        Ok(Self::new(username, password, security_token))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as sent on the wire: the password with the security token appended.
    pub(crate) fn login_password(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }
}

/// Owns the credentials, the session id and the active endpoint.
///
/// The manager is authenticated while it holds a session id. Login happens
/// lazily on the first call and again only after [`invalidate`](Self::invalidate)
/// or a failed login.
#[derive(Clone)]
pub struct SessionManager {
    credentials: Option<LoginCredentials>,
    session_id: Option<String>,
    endpoint: Option<String>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("session_id", &self.session_id.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SessionManager {
    /// An unauthenticated session that logs in with `credentials`.
    pub fn new(credentials: LoginCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            session_id: None,
            endpoint: None,
        }
    }

    /// An authenticated session from an externally obtained session id.
    ///
    /// Without credentials the manager cannot log in again once invalidated.
    pub fn with_session(session_id: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            credentials: None,
            session_id: Some(session_id.into()),
            endpoint,
        }
    }

    /// Attach credentials used for later logins.
    pub fn with_credentials(mut self, credentials: LoginCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Endpoint calls must target, or `None` for the transport default.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn credentials(&self) -> Option<&LoginCredentials> {
        self.credentials.as_ref()
    }

    /// Log in through `transport` unless a session is already held.
    ///
    /// A failed login leaves the manager unauthenticated and is not cached.
    pub async fn ensure_session<T: SoapTransport>(&mut self, transport: &T) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "No session and no login credentials".to_string(),
            ))
        })?;

        debug!(username = credentials.username(), "Logging in");
        let login = transport
            .login(credentials.username(), &credentials.login_password())
            .await?;

        debug!(endpoint = %login.server_url, "Session established");
        self.session_id = Some(login.session_id);
        self.endpoint = Some(login.server_url);
        Ok(())
    }

    /// Use an externally obtained session id.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    /// Target a different endpoint.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, "Endpoint changed");
        self.endpoint = Some(endpoint);
    }

    /// Drop the session and the endpoint override so the next call logs in again.
    pub fn invalidate(&mut self) {
        debug!("Session invalidated");
        self.session_id = None;
        self.endpoint = None;
    }

    /// `SessionHeader { sessionId }` for the current session.
    pub fn session_header(&self) -> Option<SoapHeader> {
        self.session_id.as_ref().map(|id| {
            let mut fields = Fields::new();
            fields.insert("sessionId".to_string(), Value::from(id));
            SoapHeader::new(busbar_sf_soap::METADATA_NAMESPACE, SESSION_HEADER, fields)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busbar_sf_soap::{LoginResult, ResponseEnvelope, SoapCall};
    use std::sync::Mutex;

    #[derive(Default)]
    struct LoginOnly {
        logins: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl SoapTransport for LoginOnly {
        fn type_descriptors(&self) -> Vec<String> {
            Vec::new()
        }

        async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
            self.logins
                .lock()
                .unwrap()
                .push((username.to_string(), password.to_string()));
            if self.fail {
                return Err(Error::fault("sf:INVALID_LOGIN", "Invalid username"));
            }
            Ok(LoginResult {
                session_id: "SESSION".to_string(),
                server_url: "https://na1.salesforce.com/services/Soap/m/62.0/00D".to_string(),
            })
        }

        async fn invoke(&self, _call: SoapCall<'_>) -> Result<ResponseEnvelope> {
            Ok(ResponseEnvelope::empty())
        }
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::new("user@example.com", "secret", "TOKEN")
    }

    #[tokio::test]
    async fn test_login_once_and_store_endpoint() {
        let transport = LoginOnly::default();
        let mut session = SessionManager::new(credentials());
        assert!(!session.is_authenticated());
        assert!(session.session_header().is_none());

        session.ensure_session(&transport).await.unwrap();
        session.ensure_session(&transport).await.unwrap();

        let logins = transport.logins.lock().unwrap();
        assert_eq!(
            *logins,
            vec![("user@example.com".to_string(), "secretTOKEN".to_string())]
        );
        assert_eq!(session.session_id(), Some("SESSION"));
        assert_eq!(
            session.endpoint(),
            Some("https://na1.salesforce.com/services/Soap/m/62.0/00D")
        );
    }

    #[tokio::test]
    async fn test_failed_login_is_retried() {
        let transport = LoginOnly {
            fail: true,
            ..Default::default()
        };
        let mut session = SessionManager::new(credentials());

        assert!(session.ensure_session(&transport).await.unwrap_err().is_fault());
        assert!(session.ensure_session(&transport).await.is_err());

        assert_eq!(transport.logins.lock().unwrap().len(), 2);
        assert!(!session.is_authenticated());
        assert!(session.endpoint().is_none());
    }

    #[tokio::test]
    async fn test_external_session_skips_login() {
        let transport = LoginOnly::default();
        let mut session = SessionManager::with_session("EXTERNAL", Some("https://x/m".to_string()));

        session.ensure_session(&transport).await.unwrap();
        assert!(transport.logins.lock().unwrap().is_empty());

        let header = session.session_header().unwrap();
        assert_eq!(header.name, "SessionHeader");
        assert_eq!(header.namespace, busbar_sf_soap::METADATA_NAMESPACE);
        assert_eq!(header.fields.get("sessionId"), Some(&Value::from("EXTERNAL")));
    }

    #[tokio::test]
    async fn test_invalidate_without_credentials_is_config_error() {
        let transport = LoginOnly::default();
        let mut session = SessionManager::with_session("EXTERNAL", None);
        session.invalidate();

        let err = session.ensure_session(&transport).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_setters() {
        let mut session = SessionManager::new(credentials());
        session.set_session_id("ABC");
        assert!(session.is_authenticated());
        assert!(session.endpoint().is_none());

        session.set_endpoint("https://example.my.salesforce.com/services/Soap/m/62.0");
        assert_eq!(
            session.endpoint(),
            Some("https://example.my.salesforce.com/services/Soap/m/62.0")
        );

        session.invalidate();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut session = SessionManager::new(LoginCredentials::new(
            "user@example.com",
            "super_secret_pw",
            "super_secret_token",
        ));
        session.set_session_id("super_secret_session");

        let output = format!("{:?}", session);
        assert!(output.contains("user@example.com"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super_secret"));
    }
}
