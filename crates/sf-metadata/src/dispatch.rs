//! Execution of a single remote operation.

use busbar_sf_soap::{Fields, ResponseEnvelope, Result, SoapCall, SoapHeader, SoapTransport, Value};
use tracing::instrument;

use crate::events::{CallEvent, CallListener, RequestEvent};
use crate::session::SessionManager;

/// Runs operations against a transport with session handling and events.
pub struct CallDispatcher<T> {
    transport: T,
    session: SessionManager,
    listeners: Vec<Box<dyn CallListener>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for CallDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallDispatcher")
            .field("transport", &self.transport)
            .field("session", &self.session)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: SoapTransport> CallDispatcher<T> {
    pub fn new(transport: T, session: SessionManager) -> Self {
        Self {
            transport,
            session,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: impl CallListener + 'static) {
        self.add_boxed_listener(Box::new(listener));
    }

    pub(crate) fn add_boxed_listener(&mut self, listener: Box<dyn CallListener>) {
        self.listeners.push(listener);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// Invoke `operation` with `params`.
    ///
    /// Logs in first if no session is held. A `Request` event is emitted
    /// before the transport is invoked. A failed invocation emits `Fault` and
    /// returns the same error. A response without a payload, or with a nil
    /// one, returns an empty list and emits nothing further; any other
    /// payload emits `Response` and is returned.
    #[instrument(skip(self, params))]
    pub async fn call(&mut self, operation: &str, params: Fields) -> Result<Value> {
        self.session.ensure_session(&self.transport).await?;

        let headers: Vec<SoapHeader> = self.session.session_header().into_iter().collect();
        let request = RequestEvent {
            operation: operation.to_string(),
            params,
        };
        self.emit(&CallEvent::Request(&request));

        let outcome = self
            .transport
            .invoke(SoapCall {
                operation,
                params: &request.params,
                headers: &headers,
                endpoint: self.session.endpoint(),
            })
            .await;

        match outcome {
            Err(fault) => {
                self.emit(&CallEvent::Fault {
                    fault: &fault,
                    request: &request,
                });
                Err(fault)
            }
            Ok(ResponseEnvelope {
                result: None | Some(Value::Null),
            }) => Ok(Value::empty()),
            Ok(ResponseEnvelope {
                result: Some(result),
            }) => {
                self.emit(&CallEvent::Response {
                    request: &request,
                    result: &result,
                });
                Ok(result)
            }
        }
    }

    fn emit(&self, event: &CallEvent<'_>) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}
