use busbar_sf_soap::{Result, SoapTransport, Value};
use tracing::instrument;

use super::params;
use crate::list::ListMetadataQuery;

impl<T: SoapTransport> super::MetadataClient<T> {
    /// List metadata components matching the queries.
    ///
    /// The service accepts at most three queries per call.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub async fn list_metadata(
        &mut self,
        queries: &[ListMetadataQuery],
        as_of_version: Option<f64>,
    ) -> Result<Value> {
        let queries = Value::List(queries.iter().map(ListMetadataQuery::to_value).collect());
        self.call(
            "listMetadata",
            params([
                ("queries", queries),
                ("asOfVersion", Value::from(as_of_version)),
            ]),
        )
        .await
    }
}
