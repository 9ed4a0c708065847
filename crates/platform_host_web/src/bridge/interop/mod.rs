//! Target-specific transport routing for the bridge.

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

use super::{HttpRequest, HttpResponse};

pub(super) async fn send(request: &HttpRequest) -> Result<HttpResponse, String> {
    imp::send(request).await
}

pub(super) fn encode_uri_component(raw: &str) -> String {
    imp::encode_uri_component(raw)
}
