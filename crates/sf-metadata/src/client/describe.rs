use busbar_sf_soap::{Result, SoapTransport, Value};
use tracing::instrument;

use super::params;

impl<T: SoapTransport> super::MetadataClient<T> {
    /// Describe the metadata types available at an API version.
    #[instrument(skip(self))]
    pub async fn describe_metadata(&mut self, as_of_version: f64) -> Result<Value> {
        self.call(
            "describeMetadata",
            params([("asOfVersion", Value::from(as_of_version))]),
        )
        .await
    }

    /// Describe one metadata type, e.g.
    /// `{http://soap.sforce.com/2006/04/metadata}CustomObject`.
    #[instrument(skip(self))]
    pub async fn describe_value_type(&mut self, value_type: &str) -> Result<Value> {
        self.call("describeValueType", params([("type", Value::from(value_type))]))
            .await
    }

    /// `xmlName` of every type [`describe_metadata`](Self::describe_metadata) reports.
    pub async fn list_metadata_types(&mut self, as_of_version: f64) -> Result<Vec<String>> {
        let described = self.describe_metadata(as_of_version).await?;
        Ok(described
            .get("metadataObjects")
            .map(Value::items)
            .unwrap_or_default()
            .iter()
            .filter_map(|object| object.get("xmlName").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}
