//! NOTIFY property-set parsing.

use xmltree::Element;

/// Parse an eventing property-set document into ordered key/value pairs.
///
/// The expected shape is
/// `<e:propertyset><e:property><Name>value</Name></e:property>…</e:propertyset>`;
/// each property element may carry several inner variables. Document order
/// is preserved so later values win when a key repeats.
pub(crate) fn parse_property_set(xml: &str) -> Result<Vec<(String, String)>, String> {
    let root = Element::parse(xml.as_bytes()).map_err(|e| e.to_string())?;
    if root.name != "propertyset" {
        return Err(format!("expected propertyset, got <{}>", root.name));
    }

    let mut pairs = Vec::new();
    for child in &root.children {
        let Some(property) = child.as_element() else {
            continue;
        };
        if property.name != "property" {
            continue;
        }
        for inner in &property.children {
            if let Some(variable) = inner.as_element() {
                let value = variable
                    .get_text()
                    .map(|t| t.into_owned())
                    .unwrap_or_default();
                pairs.push((variable.name.clone(), value));
            }
        }
    }

    Ok(pairs)
}
