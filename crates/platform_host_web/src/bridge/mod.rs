//! Browser capability bridge for `platform_host_web` adapters.
//!
//! The only capability crossing the JS boundary is an HTTP round trip used by the REST table
//! adapter; request shaping and response decoding stay in Rust.

mod interop;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
/// HTTP request handed to the JS `fetch` bridge.
pub(crate) struct HttpRequest {
    pub(crate) method: &'static str,
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Status and raw text body returned by the bridge.
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl HttpResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP round trip. Network failures surface as `Err`; HTTP error statuses do not.
pub(crate) async fn send(request: &HttpRequest) -> Result<HttpResponse, String> {
    interop::send(request).await
}

/// Percent-encodes one query-string component.
pub(crate) fn encode_uri_component(raw: &str) -> String {
    interop::encode_uri_component(raw)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_send_reports_unsupported_transport() {
        let request = HttpRequest {
            method: "GET",
            url: "https://db.example.co/rest/v1/player_data".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = block_on(send(&request)).expect_err("no fetch outside wasm32");
        assert_eq!(
            err,
            "Browser fetch is only available when compiled for wasm32".to_string()
        );
    }

    #[test]
    fn query_components_are_encoded_like_the_browser() {
        assert_eq!(encode_uri_component("user 1"), "user%201");
        assert_eq!(encode_uri_component("a,b"), "a%2Cb");
        assert_eq!(encode_uri_component("it's(ok)!*~"), "it's(ok)!*~");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn only_2xx_statuses_are_success() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let conflict = HttpResponse {
            status: 409,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!conflict.is_success());
    }
}
