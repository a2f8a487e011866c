//! Assembly of the outgoing HTTP request.

use url::Url;

use crate::config::Binding;
use crate::transform::envelope::Envelope;

/// A fully assembled request, ready for dispatch. Stateless; derived per
/// message and discarded after the attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Build the outgoing request for one message. Never fails: interpretation
/// problems fall back to the default envelope.
pub fn build_request(content: &str, binding: &Binding) -> OutgoingRequest {
    let mut headers: Vec<(String, String)> = Vec::new();
    set_header(&mut headers, "Content-Type", "application/json");
    if let Some(auth) = &binding.auth {
        set_header(&mut headers, "Authorization", auth);
    }
    if let Some(static_headers) = &binding.headers {
        for (name, value) in static_headers {
            set_header(&mut headers, name, value);
        }
    }

    let envelope = if binding.interprets_content() {
        Envelope::classify(content)
    } else {
        Envelope::Default(content.to_string())
    };

    match envelope {
        Envelope::Default(text) => OutgoingRequest {
            url: binding.url.clone(),
            headers,
            body: serde_json::to_vec(&serde_json::json!({ "payload": text }))
                .unwrap_or_default(),
        },
        Envelope::Override {
            body,
            headers: overrides,
            path_suffix,
        } => {
            // Message headers land last: the producer has final say.
            if let Some(overrides) = overrides {
                for (name, value) in &overrides {
                    set_header(&mut headers, name, value);
                }
            }
            let url = match path_suffix {
                Some(suffix) => append_path_suffix(&binding.url, &suffix),
                None => binding.url.clone(),
            };
            OutgoingRequest {
                url,
                headers,
                body: serde_json::to_vec(&body).unwrap_or_default(),
            }
        }
    }
}

/// Insert or replace a header, matching names case-insensitively so an
/// override of `content-type` replaces the default `Content-Type` instead
/// of duplicating it.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(slot) = headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        slot.1 = value.to_string();
    } else {
        headers.push((name.to_string(), value.to_string()));
    }
}

/// Append a suffix to the path component of a URL. An unparseable URL gets
/// the suffix appended textually so the dispatcher still sees (and reports)
/// the bad URL instead of it being silently dropped here.
fn append_path_suffix(url: &str, suffix: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let path = format!("{}{}", parsed.path(), suffix);
            parsed.set_path(&path);
            parsed.into()
        }
        Err(_) => format!("{}{}", url, suffix),
    }
}
