//! SOAP 1.1 envelope encoding and decoding.

use base64::{engine::general_purpose, Engine as _};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Result};
use crate::transport::{ResponseEnvelope, SoapCall, SoapHeader};
use crate::value::{Fields, Value};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Encode a call as a document/literal SOAP envelope.
///
/// The operation element is placed in `namespace`; parameters inherit it.
pub fn encode_request(namespace: &str, call: &SoapCall<'_>) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENVELOPE_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}">"#
    ));
    out.push('\n');

    if !call.headers.is_empty() {
        out.push_str("  <soapenv:Header>\n");
        for header in call.headers {
            write_header(&mut out, header);
        }
        out.push_str("  </soapenv:Header>\n");
    }

    out.push_str("  <soapenv:Body>\n");
    out.push_str(&format!(
        "    <{} xmlns=\"{}\">\n",
        call.operation,
        escape(namespace)
    ));
    for (name, value) in call.params {
        write_element(&mut out, name, value, 3);
    }
    out.push_str(&format!("    </{}>\n", call.operation));
    out.push_str("  </soapenv:Body>\n");
    out.push_str("</soapenv:Envelope>");
    out
}

fn write_header(out: &mut String, header: &SoapHeader) {
    out.push_str(&format!(
        "    <{} xmlns=\"{}\">\n",
        header.name,
        escape(&header.namespace)
    ));
    write_fields(out, &header.fields, 3);
    out.push_str(&format!("    </{}>\n", header.name));
}

fn write_fields(out: &mut String, fields: &Fields, depth: usize) {
    for (name, value) in fields {
        write_element(out, name, value, depth);
    }
}

fn write_element(out: &mut String, name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Null => {}
        Value::List(items) => {
            for item in items {
                write_element(out, name, item, depth);
            }
        }
        Value::Struct(fields) => {
            out.push_str(&format!("{indent}<{name}>\n"));
            write_fields(out, fields, depth + 1);
            out.push_str(&format!("{indent}</{name}>\n"));
        }
        Value::Variant(variant) => {
            out.push_str(&format!(
                "{indent}<{name} xmlns:mns=\"{}\" xsi:type=\"mns:{}\">\n",
                escape(&variant.namespace),
                variant.type_name
            ));
            write_fields(out, &variant.fields, depth + 1);
            out.push_str(&format!("{indent}</{name}>\n"));
        }
        Value::Bytes(bytes) => {
            out.push_str(&format!(
                "{indent}<{name}>{}</{name}>\n",
                general_purpose::STANDARD.encode(bytes)
            ));
        }
        scalar => {
            let text = scalar.to_text().unwrap_or_default();
            out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape(&text)));
        }
    }
}

/// Decode a response envelope.
///
/// A `Fault` body is returned as an [`ErrorKind::SoapFault`] error. Otherwise
/// the `result` children of the response element become the payload: none
/// yields an empty envelope, one its value, several a list. Nil results
/// carry no payload.
pub fn decode_response(xml: &str) -> Result<ResponseEnvelope> {
    let root = XmlNode::parse(xml)?;
    let body = root.child("Body").ok_or_else(|| {
        Error::new(ErrorKind::InvalidResponse(
            "Missing SOAP Body in response".to_string(),
        ))
    })?;

    let Some(payload) = body.children.first() else {
        return Ok(ResponseEnvelope::empty());
    };

    if payload.name == "Fault" {
        let fault_code = payload.child_text("faultcode").unwrap_or_default();
        let fault_string = payload
            .child_text("faultstring")
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Error::fault(fault_code, fault_string));
    }

    let mut results: Vec<Value> = payload
        .children_named("result")
        .map(XmlNode::to_value)
        .filter(|value| !value.is_null())
        .collect();

    let result = match results.len() {
        0 => None,
        1 => results.pop(),
        _ => Some(Value::List(results)),
    };
    Ok(ResponseEnvelope { result })
}

/// A parsed XML element. Names are local names with prefixes stripped.
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(XmlNode::from_start(&e)?),
                Event::Empty(e) => {
                    let node = XmlNode::from_start(&e)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    if let Some(mut node) = stack.pop() {
                        // Indentation between child elements is not content.
                        if !node.children.is_empty() && node.text.trim().is_empty() {
                            node.text.clear();
                        }
                        attach(&mut stack, &mut root, node);
                    }
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        root.ok_or_else(|| Error::new(ErrorKind::Parse("Empty XML document".to_string())))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<XmlNode> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(XmlNode {
            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    /// Convert to a [`Value`]: leaves become their text verbatim (or `Null` when
    /// `xsi:nil="true"`), elements with children become structs, and
    /// repeated child names collapse into lists.
    pub fn to_value(&self) -> Value {
        if self.attr("nil") == Some("true") {
            return Value::Null;
        }
        if self.children.is_empty() {
            return Value::String(self.text.clone());
        }

        let mut fields = Fields::new();
        for child in &self.children {
            let value = child.to_value();
            match fields.get_mut(&child.name) {
                Some(Value::List(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::replace(existing, Value::Null);
                    *existing = Value::List(vec![first, value]);
                }
                None => {
                    fields.insert(child.name.clone(), value);
                }
            }
        }
        Value::Struct(fields)
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedVariant;

    const MET: &str = "http://soap.sforce.com/2006/04/metadata";

    fn session_header() -> SoapHeader {
        let mut fields = Fields::new();
        fields.insert("sessionId".to_string(), Value::from("00Dxx!session"));
        SoapHeader::new(MET, "SessionHeader", fields)
    }

    #[test]
    fn test_encode_request_with_header_and_params() {
        let mut params = Fields::new();
        params.insert("type".to_string(), Value::from("CustomObject"));
        params.insert(
            "fullNames".to_string(),
            Value::from(vec!["Account", "Contact"]),
        );
        params.insert("asOfVersion".to_string(), Value::Null);
        let headers = [session_header()];

        let xml = encode_request(
            MET,
            &SoapCall {
                operation: "readMetadata",
                params: &params,
                headers: &headers,
                endpoint: None,
            },
        );

        assert!(xml.contains(r#"<SessionHeader xmlns="http://soap.sforce.com/2006/04/metadata">"#));
        assert!(xml.contains("<sessionId>00Dxx!session</sessionId>"));
        assert!(xml.contains(r#"<readMetadata xmlns="http://soap.sforce.com/2006/04/metadata">"#));
        assert!(xml.contains("<type>CustomObject</type>"));
        assert!(xml.contains("<fullNames>Account</fullNames>"));
        assert!(xml.contains("<fullNames>Contact</fullNames>"));
        assert!(!xml.contains("asOfVersion"));
    }

    #[test]
    fn test_encode_variant_and_bytes() {
        let mut fields = Fields::new();
        fields.insert("fullName".to_string(), Value::from("Q&A__c"));
        fields.insert("content".to_string(), Value::Bytes(b"hi".to_vec()));
        let mut params = Fields::new();
        params.insert(
            "metadata".to_string(),
            Value::from(vec![Value::from(TypedVariant::object(
                "CustomObject",
                MET,
                fields,
            ))]),
        );

        let xml = encode_request(
            MET,
            &SoapCall {
                operation: "createMetadata",
                params: &params,
                headers: &[],
                endpoint: None,
            },
        );

        assert!(xml.contains(
            r#"<metadata xmlns:mns="http://soap.sforce.com/2006/04/metadata" xsi:type="mns:CustomObject">"#
        ));
        assert!(xml.contains("<fullName>Q&amp;A__c</fullName>"));
        assert!(xml.contains("<content>aGk=</content>"));
        assert!(!xml.contains("soapenv:Header"));
    }

    #[test]
    fn test_decode_single_result() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="http://soap.sforce.com/2006/04/metadata">
  <soapenv:Body>
    <deployResponse>
      <result>
        <done>false</done>
        <id>0Af000000000001</id>
        <state>Queued</state>
      </result>
    </deployResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

        let envelope = decode_response(xml).unwrap();
        let result = envelope.result.unwrap();
        assert_eq!(result.get("id").and_then(Value::as_str), Some("0Af000000000001"));
        assert_eq!(result.get("done").and_then(Value::as_bool), Some(false));
    }

    #[test]
    fn test_decode_multiple_results_and_repeated_children() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soapenv:Body>
    <deleteMetadataResponse>
      <result><fullName>A__c</fullName><success>true</success></result>
      <result>
        <errors><message>one</message></errors>
        <errors><message>two</message></errors>
        <fullName xsi:nil="true"/>
        <success>false</success>
      </result>
    </deleteMetadataResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

        let result = decode_response(xml).unwrap().result.unwrap();
        let items = result.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("fullName").and_then(Value::as_str), Some("A__c"));
        assert!(items[1].get("fullName").unwrap().is_null());
        assert_eq!(items[1].get("errors").unwrap().items().len(), 2);
    }

    #[test]
    fn test_decode_empty_response() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body><deleteMetadataResponse/></soapenv:Body>
</soapenv:Envelope>"#;
        let envelope = decode_response(xml).unwrap();
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_decode_nil_result_has_no_payload() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soapenv:Body>
    <deleteMetadataResponse>
      <result xsi:nil="true"/>
    </deleteMetadataResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;
        let envelope = decode_response(xml).unwrap();
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_decode_keeps_leaf_whitespace() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <readMetadataResponse>
      <result>
        <records>
          <fullName>Greeting</fullName>
          <value> Hello there </value>
        </records>
      </result>
    </readMetadataResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

        let result = decode_response(xml).unwrap().result.unwrap();
        let record = result.get("records").unwrap();
        assert_eq!(record.get("value").and_then(Value::as_str), Some(" Hello there "));
        assert_eq!(record.get("fullName").and_then(Value::as_str), Some("Greeting"));

        let root = XmlNode::parse(xml).unwrap();
        assert!(root.text.is_empty());
    }

    #[test]
    fn test_decode_fault() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="http://soap.sforce.com/2006/04/metadata">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>sf:INVALID_SESSION_ID</faultcode>
      <faultstring>INVALID_SESSION_ID: Invalid Session ID found in SessionHeader</faultstring>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#;

        let err = decode_response(xml).unwrap_err();
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.fault_code, "sf:INVALID_SESSION_ID");
        assert!(fault.fault_string.contains("Invalid Session ID"));
    }

    #[test]
    fn test_decode_rejects_missing_body() {
        let err = decode_response("<html><p>maintenance</p></html>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidResponse(_)));
    }
}
