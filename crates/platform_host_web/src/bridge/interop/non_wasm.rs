use super::{HttpRequest, HttpResponse};

fn unsupported() -> String {
    "Browser fetch is only available when compiled for wasm32".to_string()
}

pub(super) async fn send(_request: &HttpRequest) -> Result<HttpResponse, String> {
    Err(unsupported())
}

/// Mirrors JS `encodeURIComponent` so request shaping matches the browser build.
pub(super) fn encode_uri_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
