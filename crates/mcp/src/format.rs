//! Plain-text rendering of CourtListener records for tool results.

use std::fmt::Write as _;

use itertools::Itertools;
use serde_json::Value;
use upstream::Page;

const SITE: &str = "https://www.courtlistener.com";

/// Text returned in place of any upstream failure.
pub(crate) const UNAVAILABLE: &str = "Could not retrieve data from CourtListener. Please try again later.";

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Link,
    Excerpt(usize),
}

/// One labelled line of a rendered record.
#[derive(Clone, Copy)]
pub(crate) struct Field {
    label: &'static str,
    key: &'static str,
    kind: Kind,
}

impl Field {
    pub(crate) const fn text(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            key,
            kind: Kind::Text,
        }
    }

    /// A CourtListener URL, made absolute when the API returns a site path.
    pub(crate) const fn link(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            key,
            kind: Kind::Link,
        }
    }

    /// Long text cut to `max` characters.
    pub(crate) const fn excerpt(label: &'static str, key: &'static str, max: usize) -> Self {
        Self {
            label,
            key,
            kind: Kind::Excerpt(max),
        }
    }

    fn render(&self, record: &Value) -> Option<String> {
        let value = text(record, self.key)?;

        Some(match self.kind {
            Kind::Text => value,
            Kind::Link if value.starts_with('/') => format!("{SITE}{value}"),
            Kind::Link => value,
            Kind::Excerpt(max) => excerpt(&value, max),
        })
    }
}

/// Renders one page of a list endpoint.
pub(crate) fn list(page: &Page<Value>, title: impl Fn(&Value) -> Option<String>, fields: &[Field]) -> String {
    if page.results.is_empty() {
        return "No results found.".to_string();
    }

    let mut out = match page.count {
        1 => "Found 1 result.".to_string(),
        count => format!("Found {count} results."),
    };

    if page.results.len() as u64 != page.count {
        let _ = write!(out, " Showing {} on this page.", page.results.len());
    }

    for (i, record) in page.results.iter().enumerate() {
        let title = title(record).unwrap_or_else(|| "Untitled".to_string());
        let _ = write!(out, "\n\n{}. {title}", i + 1);

        for (label, value) in lines(record, fields) {
            let _ = write!(out, "\n   {label}: {value}");
        }
    }

    if page.has_more() {
        out.push_str("\n\nMore results are available.");
    }

    out
}

/// Renders a single record of a detail endpoint.
pub(crate) fn detail(record: &Value, title: Option<String>, fields: &[Field]) -> String {
    let mut out = title.unwrap_or_else(|| "Untitled".to_string());

    for (label, value) in lines(record, fields) {
        let _ = write!(out, "\n{label}: {value}");
    }

    out
}

fn lines<'a>(record: &'a Value, fields: &'a [Field]) -> impl Iterator<Item = (&'static str, String)> + 'a {
    fields
        .iter()
        .filter_map(move |field| field.render(record).map(|value| (field.label, value)))
}

/// A field as display text; `None` when missing, empty or not displayable.
pub(crate) fn text(record: &Value, key: &str) -> Option<String> {
    display(record.get(key)?)
}

/// Joins the non-empty name parts of a person record.
pub(crate) fn person_name(record: &Value) -> Option<String> {
    let name = ["name_first", "name_middle", "name_last", "name_suffix"]
        .iter()
        .filter_map(|key| text(record, key))
        .join(" ");

    Some(name).filter(|name| !name.is_empty())
}

fn display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::Array(values) => Some(values.iter().filter_map(display).join(", ")).filter(|s| !s.is_empty()),
        Value::Null | Value::Object(_) => None,
    }
}

fn excerpt(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", value[..end].trim_end()),
        None => value.to_string(),
    }
}
