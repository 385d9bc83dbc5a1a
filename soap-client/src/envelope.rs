//! SOAP envelope encoding and response decoding.
//!
//! Pure transformations: an action name plus ordered parameters in, an XML
//! byte string out, and the inverse from a response body to the decoded
//! field mapping or a typed fault. Field values are never interpreted here.

use std::collections::HashMap;

use xmltree::Element;

use crate::error::SoapError;
use crate::params::ActionParams;

/// A decoded `{Action}Response` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Local name of the response element, e.g. `GetVolumeResponse`
    pub tag: String,
    /// Immediate child element names mapped to their text content
    pub fields: HashMap<String, String>,
}

impl ActionResponse {
    /// Look up a response field, returning `""` for absent keys.
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Serialize an action call into a SOAP 1.1 envelope.
///
/// Parameters are emitted as `<key>value</key>` children of the namespaced
/// action element, in insertion order. Values are XML-escaped; nothing else
/// is done to them.
pub fn encode_request(service_uri: &str, action: &str, params: &ActionParams) -> String {
    let mut action_xml = format!(r#"<u:{action} xmlns:u="{service_uri}">"#);
    for (key, value) in params.iter() {
        action_xml.push('<');
        action_xml.push_str(key);
        action_xml.push('>');
        action_xml.push_str(&escape_xml(value));
        action_xml.push_str("</");
        action_xml.push_str(key);
        action_xml.push('>');
    }
    action_xml.push_str("</u:");
    action_xml.push_str(action);
    action_xml.push('>');

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body>{action_xml}</s:Body></s:Envelope>"
    )
}

/// Decode a SOAP response body into the `{action}Response` field mapping.
///
/// Faults win over missing response tags: if the body carries an `s:Fault`
/// element it is decoded into [`SoapError::Fault`] before the response tag
/// is looked for.
pub fn decode_response(xml: &str, action: &str) -> Result<ActionResponse, SoapError> {
    let root = Element::parse(xml.as_bytes()).map_err(|e| SoapError::Parse(e.to_string()))?;

    if root.name != "Envelope" {
        return Err(SoapError::Protocol(format!(
            "expected SOAP Envelope, got <{}>",
            root.name
        )));
    }
    let body = root
        .get_child("Body")
        .ok_or_else(|| SoapError::Protocol("missing SOAP Body".to_string()))?;

    if let Some(fault) = body.get_child("Fault") {
        return Err(decode_fault(fault));
    }

    let tag = format!("{action}Response");
    let response = body.get_child(tag.as_str()).ok_or_else(|| {
        SoapError::Protocol(format!("missing {tag} element and no fault"))
    })?;

    let mut fields = HashMap::new();
    for child in &response.children {
        if let Some(element) = child.as_element() {
            let text = element
                .get_text()
                .map(|t| t.into_owned())
                .unwrap_or_default();
            fields.insert(element.name.clone(), text);
        }
    }

    Ok(ActionResponse { tag, fields })
}

fn decode_fault(fault: &Element) -> SoapError {
    let fault_string = fault
        .get_child("faultstring")
        .and_then(|e| e.get_text())
        .map(|t| t.into_owned())
        .unwrap_or_default();

    let error_code = fault
        .get_child("detail")
        .and_then(|d| d.get_child("UPnPError"))
        .and_then(|e| e.get_child("errorCode"))
        .and_then(|c| c.get_text())
        .map(|t| t.into_owned())
        .unwrap_or_default();

    SoapError::Fault {
        fault_string,
        error_code,
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
