//! PostgREST-backed [`RemoteTables`] implementation over the browser `fetch` bridge.

use platform_host::{BackendConfig, Filter, RemoteError, RemoteFuture, RemoteTable, RemoteTables};
use serde::Deserialize;
use serde_json::Value;

use crate::bridge::{self, HttpRequest, HttpResponse};

const REST_PATH: &str = "/rest/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Remote table store speaking the PostgREST dialect (`/rest/v1/{table}`).
pub struct RestRemoteTables {
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RestRemoteTables {
    /// Creates an adapter for `base_url` authenticated with `anon_key`.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Builds an adapter when `config` carries remote credentials.
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        config
            .credentials()
            .map(|(url, anon_key)| Self::new(url, anon_key))
    }

    fn table_url(&self, table: RemoteTable, params: &[(String, String)]) -> String {
        let mut url = format!("{}{REST_PATH}/{}", self.base_url, table.name());
        for (index, (name, value)) in params.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(&bridge::encode_uri_component(name));
            url.push('=');
            url.push_str(&bridge::encode_uri_component(value));
        }
        url
    }

    fn headers(&self, prefer: Option<&str>) -> Vec<(String, String)> {
        let mut headers = vec![
            ("apikey".to_string(), self.anon_key.clone()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.anon_key),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        if let Some(prefer) = prefer {
            headers.push(("Prefer".to_string(), prefer.to_string()));
        }
        headers
    }

    pub(crate) fn select_request(&self, table: RemoteTable, filters: &[Filter]) -> HttpRequest {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter_params(filters));
        HttpRequest {
            method: "GET",
            url: self.table_url(table, &params),
            headers: self.headers(None),
            body: None,
        }
    }

    pub(crate) fn upsert_request(&self, table: RemoteTable, row: &Value) -> HttpRequest {
        let params = vec![("on_conflict".to_string(), table.key_columns().join(","))];
        HttpRequest {
            method: "POST",
            url: self.table_url(table, &params),
            headers: self.headers(Some("resolution=merge-duplicates,return=minimal")),
            body: Some(row.to_string()),
        }
    }

    pub(crate) fn insert_request(&self, table: RemoteTable, row: &Value) -> HttpRequest {
        HttpRequest {
            method: "POST",
            url: self.table_url(table, &[]),
            headers: self.headers(Some("return=representation")),
            body: Some(row.to_string()),
        }
    }

    pub(crate) fn update_request(
        &self,
        table: RemoteTable,
        filters: &[Filter],
        patch: &Value,
    ) -> HttpRequest {
        HttpRequest {
            method: "PATCH",
            url: self.table_url(table, &filter_params(filters)),
            headers: self.headers(Some("return=minimal")),
            body: Some(patch.to_string()),
        }
    }
}

impl RemoteTables for RestRemoteTables {
    fn select<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
    ) -> RemoteFuture<'a, Result<Vec<Value>, RemoteError>> {
        Box::pin(async move {
            let response = round_trip(&self.select_request(table, filters)).await?;
            decode_rows(table, &response)
        })
    }

    fn upsert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let response = round_trip(&self.upsert_request(table, &row)).await?;
            check_status(table, &response)
        })
    }

    fn insert<'a>(
        &'a self,
        table: RemoteTable,
        row: Value,
    ) -> RemoteFuture<'a, Result<Value, RemoteError>> {
        Box::pin(async move {
            let response = round_trip(&self.insert_request(table, &row)).await?;
            decode_rows(table, &response)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    RemoteError::new(format!("{}: insert returned no representation", table.name()))
                })
        })
    }

    fn update<'a>(
        &'a self,
        table: RemoteTable,
        filters: &'a [Filter],
        patch: Value,
    ) -> RemoteFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let response = round_trip(&self.update_request(table, filters, &patch)).await?;
            check_status(table, &response)
        })
    }
}

async fn round_trip(request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
    bridge::send(request).await.map_err(RemoteError::new)
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let value = match &filter.value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (filter.column.to_string(), format!("eq.{value}"))
        })
        .collect()
}

fn check_status(table: RemoteTable, response: &HttpResponse) -> Result<(), RemoteError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(decode_error(table, response))
    }
}

fn decode_rows(table: RemoteTable, response: &HttpResponse) -> Result<Vec<Value>, RemoteError> {
    check_status(table, response)?;
    if response.body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(row @ Value::Object(_)) => Ok(vec![row]),
        Ok(_) => Err(RemoteError::new(format!(
            "{}: unexpected response shape",
            table.name()
        ))),
        Err(err) => Err(RemoteError::new(format!("{}: {err}", table.name()))),
    }
}

fn decode_error(table: RemoteTable, response: &HttpResponse) -> RemoteError {
    match serde_json::from_str::<RestErrorBody>(&response.body) {
        Ok(RestErrorBody {
            code: Some(code),
            message,
        }) => RemoteError::with_code(
            code,
            message.unwrap_or_else(|| format!("{} request failed", table.name())),
        ),
        _ => RemoteError::new(format!(
            "{} request failed with HTTP {}",
            table.name(),
            response.status
        )),
    }
}
