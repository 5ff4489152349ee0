//! Per-call notifications.

use busbar_sf_soap::{Error, Fields, Value};
use tracing::{debug, warn};

/// An outgoing operation as seen by listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEvent {
    pub operation: String,
    pub params: Fields,
}

/// One step of a call, in causal order: `Request`, then either `Response`
/// or `Fault`.
#[derive(Debug, Clone, Copy)]
pub enum CallEvent<'a> {
    Request(&'a RequestEvent),
    Response {
        request: &'a RequestEvent,
        result: &'a Value,
    },
    Fault {
        fault: &'a Error,
        request: &'a RequestEvent,
    },
}

impl CallEvent<'_> {
    pub fn request(&self) -> &RequestEvent {
        match self {
            CallEvent::Request(request) => *request,
            CallEvent::Response { request, .. } | CallEvent::Fault { request, .. } => *request,
        }
    }
}

/// Receives call events synchronously, in registration order.
pub trait CallListener: Send + Sync {
    fn on_event(&self, event: &CallEvent<'_>);
}

impl<F> CallListener for F
where
    F: Fn(&CallEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &CallEvent<'_>) {
        self(event)
    }
}

/// Logs call events through `tracing`.
///
/// Parameters and payloads are not logged; they can carry credentials and
/// archive contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl CallListener for TracingListener {
    fn on_event(&self, event: &CallEvent<'_>) {
        match event {
            CallEvent::Request(request) => debug!(
                operation = %request.operation,
                params = request.params.len(),
                "Metadata API request"
            ),
            CallEvent::Response { request, result } => debug!(
                operation = %request.operation,
                items = result.items().len(),
                "Metadata API response"
            ),
            CallEvent::Fault { fault, request } => warn!(
                operation = %request.operation,
                error = %fault,
                "Metadata API fault"
            ),
        }
    }
}
