//! WSDL introspection.
//!
//! Produces the textual type descriptors consumed by schema registries, one
//! block per complex type:
//!
//! ```text
//! struct CustomObject {
//!  string label;
//!  boolean enableHistory;
//! }
//! ```
//!
//! Only the element's own fields are listed. Inherited fields (from
//! `complexContent/extension`) are left to the consumer.

use tracing::debug;

use crate::envelope::XmlNode;
use crate::error::Result;

/// Type descriptors and service address read from a WSDL document.
#[derive(Debug, Clone, Default)]
pub struct WsdlDocument {
    /// One descriptor per complex type, in document order.
    pub descriptors: Vec<String>,
    /// `soap:address` location of the first port, if any.
    pub endpoint: Option<String>,
}

impl WsdlDocument {
    /// Parse a WSDL document.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = XmlNode::parse(xml)?;
        let mut document = WsdlDocument::default();
        collect(&root, None, &mut document);
        debug!(
            types = document.descriptors.len(),
            endpoint = ?document.endpoint,
            "Parsed WSDL"
        );
        Ok(document)
    }

    /// Read and parse a WSDL file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }
}

fn collect(node: &XmlNode, enclosing_element: Option<&str>, document: &mut WsdlDocument) {
    match node.name.as_str() {
        "complexType" => {
            // Anonymous complex types are named after the element that holds them.
            if let Some(name) = node.attr("name").or(enclosing_element) {
                let mut fields = Vec::new();
                collect_fields(node, &mut fields);
                document.descriptors.push(render(name, &fields));
            }
            for child in &node.children {
                collect(child, None, document);
            }
            return;
        }
        "address" => {
            if document.endpoint.is_none() {
                document.endpoint = node.attr("location").map(str::to_string);
            }
        }
        _ => {}
    }

    let element_name = if node.name == "element" {
        node.attr("name")
    } else {
        None
    };
    for child in &node.children {
        collect(child, element_name, document);
    }
}

/// Gather `element` children with a `type`, descending through
/// `sequence`/`all`/`choice`/`complexContent`/`extension` but not into
/// nested complex types.
fn collect_fields(node: &XmlNode, fields: &mut Vec<(String, String)>) {
    for child in &node.children {
        match child.name.as_str() {
            "element" => {
                if let (Some(name), Some(ty)) = (child.attr("name"), child.attr("type")) {
                    fields.push((local_name(ty).to_string(), name.to_string()));
                }
            }
            "complexType" => {}
            _ => collect_fields(child, fields),
        }
    }
}

fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

fn render(name: &str, fields: &[(String, String)]) -> String {
    let mut out = format!("struct {name} {{\n");
    for (ty, field) in fields {
        out.push_str(&format!(" {ty} {field};\n"));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:xsd="http://www.w3.org/2001/XMLSchema"
             xmlns:tns="http://soap.sforce.com/2006/04/metadata"
             targetNamespace="http://soap.sforce.com/2006/04/metadata">
  <types>
    <xsd:schema elementFormDefault="qualified" targetNamespace="http://soap.sforce.com/2006/04/metadata">
      <xsd:complexType name="Metadata">
        <xsd:sequence>
          <xsd:element name="fullName" minOccurs="0" type="xsd:string"/>
        </xsd:sequence>
      </xsd:complexType>
      <xsd:complexType name="CustomObject">
        <xsd:complexContent>
          <xsd:extension base="tns:Metadata">
            <xsd:sequence>
              <xsd:element name="label" minOccurs="0" type="xsd:string"/>
              <xsd:element name="enableHistory" minOccurs="0" type="xsd:boolean"/>
            </xsd:sequence>
          </xsd:extension>
        </xsd:complexContent>
      </xsd:complexType>
      <xsd:simpleType name="TestLevel">
        <xsd:restriction base="xsd:string">
          <xsd:enumeration value="NoTestRun"/>
        </xsd:restriction>
      </xsd:simpleType>
      <xsd:element name="SessionHeader">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="sessionId" type="xsd:string"/>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
    </xsd:schema>
  </types>
  <service name="MetadataService">
    <port binding="tns:MetadataBinding" name="Metadata">
      <soap:address location="https://login.salesforce.com/services/Soap/m/62.0"/>
    </port>
  </service>
</definitions>"#;

    #[test]
    fn test_parse_named_and_anonymous_types() {
        let doc = WsdlDocument::parse(WSDL).unwrap();
        assert_eq!(
            doc.descriptors,
            vec![
                "struct Metadata {\n string fullName;\n}".to_string(),
                "struct CustomObject {\n string label;\n boolean enableHistory;\n}".to_string(),
                "struct SessionHeader {\n string sessionId;\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_service_address() {
        let doc = WsdlDocument::parse(WSDL).unwrap();
        assert_eq!(
            doc.endpoint.as_deref(),
            Some("https://login.salesforce.com/services/Soap/m/62.0")
        );
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("xsd:string"), "string");
        assert_eq!(local_name("tns:PackageTypeMembers"), "PackageTypeMembers");
        assert_eq!(local_name("base64Binary"), "base64Binary");
    }
}
