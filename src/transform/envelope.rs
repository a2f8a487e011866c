//! Classification of message content into an envelope.

use std::collections::HashMap;

use serde_json::Value;

/// Producer intent for one message, decided by a single parse.
///
/// A message is either an opaque payload to be wrapped in the default
/// `{"payload": ...}` envelope, or a JSON object carrying a `body` field
/// that takes control of the outgoing request shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Content is forwarded as `{"payload": <text>}` with default headers.
    Default(String),

    /// Content controls the outgoing body, and optionally headers and the
    /// URL path.
    Override {
        /// Value of the `body` field; JSON-encoded as the request body.
        body: Value,
        /// Entries of the `headers` field, merged last over all defaults.
        headers: Option<HashMap<String, String>>,
        /// Value of the `pathSuffix` field, appended to the URL path.
        path_suffix: Option<String>,
    },
}

impl Envelope {
    /// Classify message content. Never fails: anything that is not a JSON
    /// object with a `body` field is treated as an opaque payload.
    pub fn classify(content: &str) -> Envelope {
        let parsed: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(_) => return Envelope::Default(content.to_string()),
        };

        let Value::Object(mut object) = parsed else {
            return Envelope::Default(content.to_string());
        };
        let Some(body) = object.remove("body") else {
            return Envelope::Default(content.to_string());
        };

        // Malformed headers / pathSuffix fields degrade individually; the
        // body override still applies.
        let headers = object.get("headers").and_then(Value::as_object).map(|entries| {
            entries
                .iter()
                .filter_map(|(name, value)| header_value(value).map(|v| (name.clone(), v)))
                .collect()
        });
        let path_suffix = object
            .get("pathSuffix")
            .and_then(Value::as_str)
            .map(str::to_string);

        Envelope::Override {
            body,
            headers,
            path_suffix,
        }
    }
}

fn header_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
