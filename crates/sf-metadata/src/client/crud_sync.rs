use busbar_sf_soap::{Result, SoapTransport, Value};
use tracing::instrument;

use super::{names, params};
use crate::marshal::MetadataObject;

impl<T: SoapTransport> super::MetadataClient<T> {
    /// Create one or more metadata components of one type.
    ///
    /// Objects are marshalled against `metadata_type`'s schema; undeclared
    /// fields other than `Id` are dropped.
    #[instrument(skip(self, metadata))]
    pub async fn create_metadata<O: MetadataObject>(
        &mut self,
        metadata_type: &str,
        metadata: &[O],
    ) -> Result<Value> {
        let variants = self.variants(metadata_type, metadata);
        self.call("createMetadata", params([("metadata", Value::from(variants))]))
            .await
    }

    /// Read metadata components by type and full names.
    #[instrument(skip(self, full_names))]
    pub async fn read_metadata(
        &mut self,
        metadata_type: &str,
        full_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Value> {
        self.call(
            "readMetadata",
            params([
                ("type", Value::from(metadata_type)),
                ("fullNames", names(full_names)),
            ]),
        )
        .await
    }

    /// Update one or more metadata components of one type.
    #[instrument(skip(self, metadata))]
    pub async fn update_metadata<O: MetadataObject>(
        &mut self,
        metadata_type: &str,
        metadata: &[O],
    ) -> Result<Value> {
        let variants = self.variants(metadata_type, metadata);
        self.call("updateMetadata", params([("metadata", Value::from(variants))]))
            .await
    }

    /// Upsert one or more metadata components of one type.
    ///
    /// Sent as the `updateMetadata` operation.
    #[instrument(skip(self, metadata))]
    pub async fn upsert_metadata<O: MetadataObject>(
        &mut self,
        metadata_type: &str,
        metadata: &[O],
    ) -> Result<Value> {
        let variants = self.variants(metadata_type, metadata);
        self.call("updateMetadata", params([("metadata", Value::from(variants))]))
            .await
    }

    /// Delete metadata components by type and full names.
    #[instrument(skip(self, full_names))]
    pub async fn delete_metadata(
        &mut self,
        metadata_type: &str,
        full_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Value> {
        self.call(
            "deleteMetadata",
            params([
                ("type", Value::from(metadata_type)),
                ("fullNames", names(full_names)),
            ]),
        )
        .await
    }

    /// Rename a metadata component.
    #[instrument(skip(self))]
    pub async fn rename_metadata(
        &mut self,
        metadata_type: &str,
        old_full_name: &str,
        new_full_name: &str,
    ) -> Result<Value> {
        self.call(
            "renameMetadata",
            params([
                ("type", Value::from(metadata_type)),
                ("oldFullName", Value::from(old_full_name)),
                ("newFullName", Value::from(new_full_name)),
            ]),
        )
        .await
    }
}
