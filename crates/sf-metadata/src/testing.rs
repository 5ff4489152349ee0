//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use busbar_sf_soap::{
    Error, Fields, LoginResult, ResponseEnvelope, Result, SoapCall, SoapHeader, SoapTransport,
};

pub(crate) const SERVER_URL: &str = "https://na1.salesforce.com/services/Soap/m/62.0/00Dxx";

/// A call as the transport received it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub operation: String,
    pub params: Fields,
    pub headers: Vec<SoapHeader>,
    pub endpoint: Option<String>,
}

/// Answers logins with a fixed session and calls from a queue of scripted
/// responses. An exhausted queue answers with an empty envelope.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    pub descriptors: Vec<String>,
    responses: Mutex<VecDeque<Result<ResponseEnvelope>>>,
    logins: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptors(mut self, descriptors: &[&str]) -> Self {
        self.descriptors = descriptors.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn respond(self, response: Result<ResponseEnvelope>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_fault(self, code: &str, message: &str) -> Self {
        self.respond(Err(Error::fault(code, message)))
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }

    pub fn logins(&self) -> Vec<(String, String)> {
        self.logins.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

impl SoapTransport for ScriptedTransport {
    fn type_descriptors(&self) -> Vec<String> {
        self.descriptors.clone()
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        self.logins
            .lock()
            .unwrap()
            .push((username.to_string(), password.to_string()));
        Ok(LoginResult {
            session_id: "00Dxx!SESSION".to_string(),
            server_url: SERVER_URL.to_string(),
        })
    }

    async fn invoke(&self, call: SoapCall<'_>) -> Result<ResponseEnvelope> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: call.operation.to_string(),
            params: call.params.clone(),
            headers: call.headers.to_vec(),
            endpoint: call.endpoint.map(str::to_string),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ResponseEnvelope::empty()))
    }
}
