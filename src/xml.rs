//! String-level XML building blocks.
//!
//! Everything here works by concatenation. There is no DOM; a tag is just a
//! `String` that can be nested into another tag's inner XML.

use crate::error::{Result, WfstError};
use crate::ogc_xml::qualify_id;
use std::borrow::Cow;

/// Escape `<`, `>`, `&`, `'` and `"` in text content or attribute values.
pub fn escape_xml_text(input: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(input)
}

/// Ordered XML attributes.
///
/// Attributes with an empty value are kept but never rendered, so optional
/// attributes can be set unconditionally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute. Setting an existing name overwrites the value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// Render attributes as ` key="value"` pairs, skipping empty values.
pub fn attrs_to_string(attrs: &Attributes) -> String {
    attrs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!(r#" {name}="{}""#, escape_xml_text(value)))
        .collect()
}

/// Build `<ns:tag attrs>inner</ns:tag>`.
///
/// `None` as inner XML produces a self-closing tag. `Some("")` still produces
/// an explicit open/close pair, which is how empty-but-present values are
/// written. An empty `ns` writes an unprefixed tag.
pub fn build_tag(
    ns: &str,
    tag_name: &str,
    attrs: &Attributes,
    inner: Option<&str>,
) -> Result<String> {
    if tag_name.is_empty() {
        return Err(WfstError::MissingTagName { ns: ns.to_string() });
    }
    let name = if ns.is_empty() {
        Cow::Borrowed(tag_name)
    } else {
        Cow::Owned(format!("{ns}:{tag_name}"))
    };
    let attrs = attrs_to_string(attrs);

    Ok(match inner {
        Some(inner) => format!("<{name}{attrs}>{inner}</{name}>"),
        None => format!("<{name}{attrs} />"),
    })
}

/// Shorthand for a tag in the `wfs` namespace.
pub(crate) fn wfs_tag(tag_name: &str, attrs: &Attributes, inner: Option<&str>) -> Result<String> {
    build_tag("wfs", tag_name, attrs, inner)
}

/// `<fes:ResourceId rid="layer.id"/>`
pub(crate) fn id_filter(layer: &str, id: &str) -> String {
    format!(
        r#"<fes:ResourceId rid="{}"/>"#,
        escape_xml_text(&qualify_id(layer, id))
    )
}
