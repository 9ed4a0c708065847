use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{HttpRequest, HttpResponse};

#[wasm_bindgen(inline_js = r#"
export async function jsHttpSend(method, url, headersJson, body) {
  const headers = JSON.parse(headersJson);
  const init = { method, headers };
  if (body !== undefined && body !== null) {
    init.body = body;
  }
  const response = await fetch(url, init);
  const text = await response.text();
  return JSON.stringify({ status: response.status, body: text });
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsHttpSend)]
    fn js_http_send(method: &str, url: &str, headers_json: &str, body: Option<String>) -> Promise;
}

pub(super) async fn send(request: &HttpRequest) -> Result<HttpResponse, String> {
    let headers = request
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
        .collect::<serde_json::Map<String, serde_json::Value>>();
    let headers_json = serde_json::to_string(&headers).map_err(|e| e.to_string())?;
    let promise = js_http_send(
        request.method,
        &request.url,
        &headers_json,
        request.body.clone(),
    );
    let value = JsFuture::from(promise).await.map_err(js_error_to_string)?;
    let raw = value
        .as_string()
        .ok_or_else(|| "fetch bridge returned a non-string payload".to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

pub(super) fn encode_uri_component(raw: &str) -> String {
    js_sys::encode_uri_component(raw).into()
}
