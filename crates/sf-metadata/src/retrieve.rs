//! Retrieve inputs.

use busbar_sf_soap::{Fields, Value};

/// Package type name the unpackaged selection is marshalled as.
pub(crate) const PACKAGE_TYPE: &str = "Package";

/// Members of one metadata type selected for retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

impl PackageTypeMembers {
    pub fn new(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Every component of the type.
    pub fn all(name: impl Into<String>) -> Self {
        Self::new(name, ["*"])
    }

    fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert("members".into(), Value::from(self.members.clone()));
        fields.insert("name".into(), Value::from(&self.name));
        Value::Struct(fields)
    }
}

/// Package-level options of an unpackaged retrieve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageOptions {
    pub full_name: Option<String>,
    pub api_access_level: Option<String>,
    pub description: Option<String>,
    pub namespace_prefix: Option<String>,
    pub post_install_class: Option<String>,
    pub setup_weblink: Option<String>,
    pub uninstall_class: Option<String>,
    /// Package API version, e.g. `62.0`.
    pub version: Option<String>,
}

impl PackageOptions {
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Package object: the set options plus `types` from `members`.
    pub(crate) fn package_fields(&self, members: &[PackageTypeMembers]) -> Fields {
        let options = [
            ("fullName", &self.full_name),
            ("apiAccessLevel", &self.api_access_level),
            ("description", &self.description),
            ("namespacePrefix", &self.namespace_prefix),
            ("postInstallClass", &self.post_install_class),
            ("setupWeblink", &self.setup_weblink),
        ];

        let mut fields: Fields = options
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), Value::from(v))))
            .collect();
        fields.insert(
            "types".into(),
            Value::List(members.iter().map(PackageTypeMembers::to_value).collect()),
        );
        if let Some(class) = &self.uninstall_class {
            fields.insert("uninstallClass".into(), Value::from(class));
        }
        if let Some(version) = &self.version {
            fields.insert("version".into(), Value::from(version));
        }
        fields
    }
}

/// Everything a `retrieve` call sends besides the package itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrieveRequest {
    /// Type/member selections of the unpackaged package.
    pub members: Vec<PackageTypeMembers>,
    pub package: PackageOptions,
    pub package_names: Option<Vec<String>>,
    pub single_package: Option<bool>,
    pub specific_files: Option<Vec<String>>,
    pub api_version: Option<f64>,
}

impl RetrieveRequest {
    pub fn new(members: Vec<PackageTypeMembers>) -> Self {
        Self {
            members,
            ..Default::default()
        }
    }

    pub fn with_package(mut self, package: PackageOptions) -> Self {
        self.package = package;
        self
    }

    pub fn with_package_names(mut self, names: Vec<String>) -> Self {
        self.package_names = Some(names);
        self
    }

    pub fn with_single_package(mut self, single_package: bool) -> Self {
        self.single_package = Some(single_package);
        self
    }

    pub fn with_specific_files(mut self, files: Vec<String>) -> Self {
        self.specific_files = Some(files);
        self
    }

    pub fn with_api_version(mut self, api_version: f64) -> Self {
        self.api_version = Some(api_version);
        self
    }

    /// `retrieveRequest` element around an already marshalled package.
    pub(crate) fn to_value(&self, unpackaged: Value) -> Value {
        let mut fields = Fields::new();
        fields.insert("apiVersion".into(), self.api_version.into());
        fields.insert("packageNames".into(), self.package_names.clone().into());
        fields.insert("singlePackage".into(), self.single_package.into());
        fields.insert("specificFiles".into(), self.specific_files.clone().into());
        fields.insert("unpackaged".into(), unpackaged);
        Value::Struct(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_fields_in_schema_order() {
        let options = PackageOptions::default()
            .with_full_name("MyPackage")
            .with_version("62.0");
        let members = [
            PackageTypeMembers::new("ApexTrigger", ["AccountTrigger", "OpportunityTrigger"]),
            PackageTypeMembers::all("CustomObject"),
        ];

        let fields = options.package_fields(&members);

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["fullName", "types", "version"]
        );
        let types = fields.get("types").unwrap().items();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].get("name"), Some(&Value::from("ApexTrigger")));
        assert_eq!(types[0].get("members").unwrap().items().len(), 2);
        assert_eq!(
            types[1].get("members"),
            Some(&Value::from(vec!["*"]))
        );
    }

    #[test]
    fn test_empty_options_still_carry_types() {
        let fields = PackageOptions::default().package_fields(&[]);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["types"]);
        assert!(fields.get("types").unwrap().is_empty());
    }

    #[test]
    fn test_request_value_order() {
        let request = RetrieveRequest::new(vec![])
            .with_single_package(true)
            .with_api_version(62.0);

        let value = request.to_value(Value::from("pkg"));
        let fields = value.as_struct().unwrap();
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["apiVersion", "packageNames", "singlePackage", "specificFiles", "unpackaged"]
        );
        assert_eq!(fields.get("apiVersion"), Some(&Value::Double(62.0)));
        assert_eq!(fields.get("singlePackage"), Some(&Value::Bool(true)));
        assert!(fields.get("packageNames").unwrap().is_null());
    }
}
