//! List inputs.

use busbar_sf_soap::{Fields, Value};

/// One `listMetadata` query: a metadata type and, for foldered types, a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMetadataQuery {
    pub metadata_type: String,
    pub folder: Option<String>,
}

impl ListMetadataQuery {
    pub fn new(metadata_type: impl Into<String>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            folder: None,
        }
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert("folder".into(), self.folder.as_ref().into());
        fields.insert("type".into(), Value::from(&self.metadata_type));
        Value::Struct(fields)
    }
}
