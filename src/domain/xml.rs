//! Helpers for the flat XML fragments the BI server and job files use.

use std::collections::BTreeMap;

use crate::domain::AppError;

const FRAGMENT_ROOT: &str = "fragment";

/// Escape the five XML entities.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<tag>escaped value</tag>`
pub fn tag(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value))
}

/// Text of every element in an XML fragment, keyed by tag name.
///
/// The first occurrence of a name wins. The fragment may hold several
/// top-level elements and an optional XML declaration.
pub fn read_tags(fragment: &str) -> Result<BTreeMap<String, String>, AppError> {
    let body = strip_declaration(fragment);
    let wrapped = format!("<{FRAGMENT_ROOT}>{body}</{FRAGMENT_ROOT}>");
    let doc = roxmltree::Document::parse(&wrapped).map_err(|e| AppError::ParseError {
        what: "XML fragment".into(),
        details: e.to_string(),
    })?;

    let mut tags = BTreeMap::new();
    for node in doc.root_element().descendants().skip(1).filter(|n| n.is_element()) {
        let text: String =
            node.descendants().filter(|n| n.is_text()).filter_map(|n| n.text()).collect();
        tags.entry(node.tag_name().name().to_string()).or_insert(text);
    }
    Ok(tags)
}

fn strip_declaration(fragment: &str) -> &str {
    let trimmed = fragment.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return &trimmed[end + 2..];
    }
    fragment
}
