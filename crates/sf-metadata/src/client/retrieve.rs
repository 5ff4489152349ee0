use busbar_sf_soap::{Result, SoapTransport, Value};
use tracing::instrument;

use super::params;
use crate::retrieve::{RetrieveRequest, PACKAGE_TYPE};

impl<T: SoapTransport> super::MetadataClient<T> {
    /// Start retrieving unpackaged components.
    ///
    /// The package object is assembled from the request's package options
    /// and member selections, marshalled as a `Package` variant, and sent as
    /// `retrieveRequest.unpackaged`. Returns the async result naming the
    /// retrieve id.
    #[instrument(skip(self, request), fields(types = request.members.len()))]
    pub async fn retrieve(&mut self, request: &RetrieveRequest) -> Result<Value> {
        let package = [request.package.package_fields(&request.members)];
        let unpackaged = self
            .marshaller
            .create_variants([(PACKAGE_TYPE, &package[..])])
            .into_iter()
            .next()
            .map_or(Value::Null, Value::from);

        self.call(
            "retrieve",
            params([("retrieveRequest", request.to_value(unpackaged))]),
        )
        .await
    }

    /// Check the status of a retrieve operation.
    #[instrument(skip(self))]
    pub async fn check_retrieve_status(
        &mut self,
        async_process_id: &str,
        include_zip: bool,
    ) -> Result<Value> {
        self.call(
            "checkRetrieveStatus",
            params([
                ("asyncProcessId", Value::from(async_process_id)),
                ("includeZip", Value::from(include_zip)),
            ]),
        )
        .await
    }
}
