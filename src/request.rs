use std::collections::BTreeMap;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Method,
};
use serde::Serialize;

use crate::{PageError, Result};

pub(crate) const REDACTED: &str = "[REDACTED]";

/// Everything needed to issue one request. Built once per run.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: serde_json::Value,
}

impl RequestDescriptor {
    /// A POST request carrying `body` as JSON.
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|err| PageError::Unknown(format!("payload is not valid JSON: {err}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Adds a plain header.
    pub fn header(self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value, false)
    }

    /// Adds a header whose value must never be logged.
    pub fn secret_header(self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value, true)
    }

    fn insert_header(mut self, name: &str, value: &str, sensitive: bool) -> Result<Self> {
        let name = HeaderName::try_from(name)
            .map_err(|err| PageError::InvalidConfiguration(format!("header name {name:?}: {err}")))?;
        let mut value = HeaderValue::from_str(value).map_err(|_| {
            // The value itself may be a secret; only the header name is reported.
            PageError::InvalidConfiguration(format!("header {name} has an invalid value"))
        })?;
        value.set_sensitive(sensitive);
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Header names mapped to loggable values, sensitive ones replaced.
    pub fn redacted_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let shown = if value.is_sensitive() {
                    REDACTED.to_owned()
                } else {
                    value.to_str().unwrap_or("<non-ascii>").to_owned()
                };
                (name.as_str().to_owned(), shown)
            })
            .collect()
    }
}
