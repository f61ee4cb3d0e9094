use std::fmt;

/// Body of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not JSON; holds the leading characters only.
    Text(String),
}

impl ResponseBody {
    pub(crate) fn parse(raw: &str, preview_chars: usize) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(preview(raw, preview_chars).to_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A 2xx response.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub status: u16,
    pub body: ResponseBody,
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::{preview, ResponseBody};
    use serde_json::json;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("hello", 500), "hello");
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("héllo wörld", 4), "héll");
    }

    #[test]
    fn parse_prefers_json() {
        assert_eq!(
            ResponseBody::parse(r#"{"id":"page-1"}"#, 5),
            ResponseBody::Json(json!({"id": "page-1"}))
        );
    }

    #[test]
    fn parse_falls_back_to_truncated_text() {
        let raw = "<html>".repeat(200);
        match ResponseBody::parse(&raw, 500) {
            ResponseBody::Text(text) => assert_eq!(text.chars().count(), 500),
            other => panic!("expected text body, got {other:?}"),
        }
    }
}
