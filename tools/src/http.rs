//! `http_request`: one outbound HTTP call to any app or API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::env::{describe, ToolEnv};
use crate::model::{ToolOutput, ToolSpec, ToolStatus};

pub const TOOL_NAME: &str = "http_request";
pub const DESCRIPTION: &str =
    "Make an HTTP call to any app or API. Params: url, method, headers, json, data, timeout.";

/// Characters of response body kept in `response_preview`.
pub const PREVIEW_CHARS: usize = 1000;

pub async fn run(spec: &ToolSpec, env: &ToolEnv) -> ToolOutput {
    let method = spec.str_param("method").unwrap_or("GET").to_uppercase();

    let Some(url) = spec.str_param("url") else {
        return ToolOutput::new(TOOL_NAME, ToolStatus::Skipped)
            .with("reason", "No URL provided")
            .with("method", method);
    };

    let timeout = spec.timeout(env.default_timeout);
    debug!("http_request {} {} (timeout {:?})", method, url, timeout);

    match send(spec, env, &method, url, timeout).await {
        Ok(output) => output,
        Err(error) => {
            warn!("http_request {} {} failed: {}", method, url, error);
            ToolOutput::new(TOOL_NAME, ToolStatus::Error)
                .with("method", method)
                .with("url", url)
                .with("error", error)
        }
    }
}

async fn send(
    spec: &ToolSpec,
    env: &ToolEnv,
    method: &str,
    url: &str,
    timeout: Duration,
) -> Result<ToolOutput, String> {
    let verb = Method::from_bytes(method.as_bytes())
        .map_err(|_| format!("invalid HTTP method '{}'", method))?;

    let mut request = env.client.request(verb, url).timeout(timeout);
    if let Some(headers) = spec.param("headers") {
        request = request.headers(request_headers(headers)?);
    }
    request = attach_body(request, spec);

    let response = request.send().await.map_err(|e| describe(&e))?;
    let status = response.status().as_u16();
    let headers = response_headers(response.headers());
    let preview = read_preview(response).await.map_err(|e| describe(&e))?;

    Ok(ToolOutput::new(TOOL_NAME, ToolStatus::Code(status))
        .with("method", method)
        .with("url", url)
        .with("response_preview", preview)
        .with("headers", headers))
}

// `json` wins over `data`; an object `data` is form-encoded, anything else is sent raw.
fn attach_body(request: RequestBuilder, spec: &ToolSpec) -> RequestBuilder {
    if let Some(json) = spec.param("json") {
        return request.json(json);
    }

    match spec.param("data") {
        Some(Value::Object(fields)) => {
            let form: Vec<(&str, String)> = fields
                .iter()
                .map(|(key, value)| (key.as_str(), plain_text(value)))
                .collect();
            request.form(&form)
        }
        Some(Value::String(raw)) => request.body(raw.clone()),
        Some(other) => request.body(other.to_string()),
        None => request,
    }
}

fn request_headers(headers: &Value) -> Result<HeaderMap, String> {
    let Value::Object(entries) = headers else {
        return Err("params.headers must be an object".to_string());
    };

    let mut map = HeaderMap::with_capacity(entries.len());
    for (name, value) in entries {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| format!("invalid header name '{}'", name))?;
        let header_value = HeaderValue::from_str(&plain_text(value))
            .map_err(|_| format!("invalid value for header '{}'", name))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

// Repeated headers are joined with ", ".
fn response_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut flat = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        flat.insert(name.as_str().to_string(), Value::String(joined));
    }
    flat
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// Stops reading once the preview is covered; a UTF-8 char is at most 4 bytes.
async fn read_preview(mut response: Response) -> Result<String, reqwest::Error> {
    let limit = PREVIEW_CHARS * 4;
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await? {
            Some(chunk) => body.extend_from_slice(&chunk),
            None => break,
        }
    }
    Ok(String::from_utf8_lossy(&body).chars().take(PREVIEW_CHARS).collect())
}
