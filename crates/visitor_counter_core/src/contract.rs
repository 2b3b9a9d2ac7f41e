use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
pub const ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const STORE_FAILURE_ERROR: &str = "Failed to process visitor count";
pub const INTERNAL_FAILURE_ERROR: &str = "An internal server error occurred";

pub type Headers = BTreeMap<String, String>;

/// Inbound API Gateway event, reduced to the fields the counter reads.
///
/// Both payload versions are accepted: HTTP APIs (v2) carry the method under
/// `requestContext.http.method`, REST APIs (v1) carry it as `httpMethod`.
/// Fields holding the wrong JSON type read as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayEvent {
    #[serde(rename = "requestContext", default, deserialize_with = "lenient")]
    pub request_context: Option<RequestContext>,
    #[serde(rename = "httpMethod", default, deserialize_with = "lenient")]
    pub http_method: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestContext {
    #[serde(default, deserialize_with = "lenient")]
    pub http: Option<HttpDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl GatewayEvent {
    pub fn method_token(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|context| context.http.as_ref())
            .and_then(|http| http.method.as_deref())
            .filter(|method| !method.is_empty())
            .or(self.http_method.as_deref())
    }

    pub fn method(&self) -> HttpMethod {
        HttpMethod::from_token(self.method_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    /// OPTIONS, a missing method, and anything unrecognised.
    Other,
}

impl HttpMethod {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("GET") => Self::Get,
            Some("POST") => Self::Post,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Headers,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn count(allowed_origin: &str, count: u64) -> Self {
        Self {
            status_code: 200,
            headers: json_headers(allowed_origin),
            body: json!({ "count": count }).to_string(),
        }
    }

    pub fn preflight(allowed_origin: &str) -> Self {
        Self {
            status_code: 200,
            headers: cors_headers(allowed_origin),
            body: String::new(),
        }
    }

    pub fn store_failure(allowed_origin: &str, details: &str) -> Self {
        error_response(allowed_origin, STORE_FAILURE_ERROR, details)
    }

    pub fn internal_failure(allowed_origin: &str, details: &str) -> Self {
        error_response(allowed_origin, INTERNAL_FAILURE_ERROR, details)
    }
}

fn error_response(allowed_origin: &str, error: &str, details: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 500,
        headers: json_headers(allowed_origin),
        body: json!({
            "error": error,
            "details": details,
        })
        .to_string(),
    }
}

pub fn cors_headers(allowed_origin: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        "Access-Control-Allow-Origin".to_string(),
        allowed_origin.to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        ALLOWED_METHODS.to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        ALLOWED_HEADERS.to_string(),
    );
    headers
}

pub fn json_headers(allowed_origin: &str) -> Headers {
    let mut headers = cors_headers(allowed_origin);
    headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
    headers
}
