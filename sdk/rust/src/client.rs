use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::observer::Observers;
use crate::services::{DriverService, FareRateService, RideFareService, SosService, VehicleService};

/// A completed 2xx call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub url: Url,
    /// Parsed JSON, or the raw text as a JSON string.
    pub data: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.data.clone()).map_err(|source| ApiError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Shared HTTP client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool and observers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    observers: Observers,
}

impl ApiClient {
    /// Build a client with logging observers installed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_observers(config, Observers::logging(config.timeout))
    }

    pub fn with_observers(config: &ClientConfig, observers: Observers) -> Result<Self, ApiError> {
        let base_url = config.resolve_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Build)?;

        tracing::info!(
            environment = config.environment.as_str(),
            base_url = %base_url,
            "API client configured"
        );

        Ok(Self {
            http,
            base_url,
            observers,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn drivers(&self) -> DriverService<'_> {
        DriverService::new(self)
    }

    pub fn vehicles(&self) -> VehicleService<'_> {
        VehicleService::new(self)
    }

    pub fn fare_rates(&self) -> FareRateService<'_> {
        FareRateService::new(self)
    }

    pub fn ride_fares(&self) -> RideFareService<'_> {
        RideFareService::new(self)
    }

    pub fn sos(&self) -> SosService<'_> {
        SosService::new(self)
    }

    /// Issue a call without a body.
    pub async fn call(&self, endpoint: Endpoint<'_>) -> Result<ApiResponse, ApiError> {
        self.send(endpoint, None::<&Value>).await
    }

    /// Issue a call, JSON-encoding `body` when present.
    ///
    /// Every outcome, including a request that could not be built, is shown
    /// to the response observers before it is returned.
    pub async fn send<B>(&self, endpoint: Endpoint<'_>, body: Option<&B>) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let method = endpoint.method();
        let url = endpoint.url(&self.base_url);

        let outcome = match self.build_request(&method, &url, body) {
            Ok(request) => {
                self.observers.before_request(&request);
                self.dispatch(method, url, request).await
            }
            Err(e) => Err(e),
        };
        self.observers.after_response(&outcome);
        outcome
    }

    fn build_request<B>(&self, method: &Method, url: &Url, body: Option<&B>) -> Result<Request, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        builder.build().map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })
    }

    async fn dispatch(&self, method: Method, url: Url, request: Request) -> Result<ApiResponse, ApiError> {
        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(source) => return Err(ApiError::Transport { method, url, source }),
        };

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            // A declared-JSON error body that does not parse is kept as text.
            let data = decode_body(is_json, &bytes).unwrap_or_else(|_| raw_text(&bytes));
            return Err(ApiError::Status {
                method,
                url,
                status,
                data,
            });
        }

        let data = decode_body(is_json, &bytes).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;

        Ok(ApiResponse { status, url, data })
    }
}

fn raw_text(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

/// Parse a declared-JSON body, or wrap anything else as a JSON string.
/// An empty JSON body decodes to `null`.
pub(crate) fn decode_body(is_json: bool, bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if is_json {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(bytes)
    } else {
        Ok(raw_text(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_bodies_are_parsed() {
        assert_eq!(decode_body(true, br#"{"rate":12.5}"#).unwrap(), json!({"rate": 12.5}));
    }

    #[test]
    fn text_bodies_become_strings() {
        assert_eq!(decode_body(false, b"Driver deleted").unwrap(), json!("Driver deleted"));
    }

    #[test]
    fn empty_json_body_is_null() {
        assert_eq!(decode_body(true, b"").unwrap(), Value::Null);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode_body(true, b"{oops").is_err());
    }

    #[test]
    fn typed_decoding() {
        #[derive(serde::Deserialize)]
        struct Rate {
            rate: f64,
        }
        let response = ApiResponse {
            status: StatusCode::OK,
            url: Url::parse("http://backend.local/api/fare/get").unwrap(),
            data: json!({"rate": 14.0}),
        };
        assert_eq!(response.json::<Rate>().unwrap().rate, 14.0);
        assert!(response.json::<Vec<String>>().is_err());
    }
}
