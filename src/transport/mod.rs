pub mod events;
pub mod interceptor;

use crate::config::Config;
use crate::error::AppError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub use events::{LogEvents, TransportEvents};

/// A 2xx response with its body parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `null` when the body was empty or not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// A top-level field of the body, treating `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name).filter(|v| !v.is_null())
    }

    /// The envelope's `data` field.
    pub fn data(&self) -> Option<&Value> {
        self.field("data")
    }

    /// Takes the envelope's `data` field, `null` if missing.
    pub fn into_data(self) -> Value {
        match self.body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// Deserializes the envelope's `data` field.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<T, AppError> {
        Ok(serde_json::from_value(self.into_data())?)
    }

    /// Deserializes the whole body.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Joins raw segments into a relative path, percent-encoding each one so a
/// caller-supplied id stays a single segment. Empty, `.` and `..` segments are refused.
pub fn encoded_path(segments: &[&str]) -> Result<String, AppError> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(AppError::Validation(format!("Invalid path segment {:?}", bad)));
    }
    let mut url = Url::parse("http://localhost/").map_err(|e| AppError::Request(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Request("URL cannot take path segments".into()))?
        .extend(segments);
    Ok(url.path().to_string())
}

/// The single HTTP client every API call goes through.
///
/// Holds the base URL, the layer-wide timeout, default JSON headers and a cookie
/// store so the server's session cookie is forwarded on every call. Each call is
/// passed through [`interceptor::outbound`] and [`interceptor::inbound`].
pub struct Transport {
    client: Client,
    base_url: String,
    events: Arc<dyn TransportEvents>,
}

impl Transport {
    pub fn new(config: &Config, events: Arc<dyn TransportEvents>) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `path` against the base URL. Leading slashes are optional.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiResponse, AppError> {
        self.send(self.client.get(self.url(path)).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, AppError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// POST with no request body.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.send(self.client.post(self.url(path))).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, AppError> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    pub async fn patch_multipart(&self, path: &str, form: Form) -> Result<ApiResponse, AppError> {
        self.send(self.client.patch(self.url(path)).multipart(form))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.send(self.client.delete(self.url(path))).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse, AppError> {
        let (request, request_id) = interceptor::outbound(builder, self.events.as_ref())?;
        let result = self.client.execute(request).await;
        interceptor::inbound(result, request_id, self.events.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(base_url: &str) -> Transport {
        Transport::new(&Config::with_base_url(base_url), Arc::new(LogEvents)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let transport = transport("http://localhost:5000/api/v1/");
        assert_eq!(transport.base_url(), "http://localhost:5000/api/v1");
        assert_eq!(
            transport.url("/customers/me"),
            "http://localhost:5000/api/v1/customers/me"
        );
        assert_eq!(
            transport.url("customers/profile"),
            "http://localhost:5000/api/v1/customers/profile"
        );
    }

    #[test]
    fn test_encoded_path_keeps_ids_in_one_segment() {
        assert_eq!(encoded_path(&["mechanics", "m1"]).unwrap(), "/mechanics/m1");
        assert_eq!(
            encoded_path(&["mechanics", "../customers/me"]).unwrap(),
            "/mechanics/..%2Fcustomers%2Fme"
        );
        assert_eq!(
            encoded_path(&["mechanics", "m1?admin=true"]).unwrap(),
            "/mechanics/m1%3Fadmin=true"
        );
        assert_eq!(encoded_path(&["mechanics", "m1#x"]).unwrap(), "/mechanics/m1%23x");

        let transport = transport("http://localhost:5000/api/v1");
        let url = Url::parse(&transport.url(&encoded_path(&["mechanics", "m1?a#b"]).unwrap())).unwrap();
        assert_eq!(url.path(), "/api/v1/mechanics/m1%3Fa%23b");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        for bad in ["..", ".", ""] {
            let err = encoded_path(&["mechanics", bad]).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        }
    }

    #[test]
    fn test_envelope_accessors() {
        let response = ApiResponse {
            status: 200,
            body: json!({ "success": true, "data": [1, 2], "user": null }),
        };
        assert_eq!(response.data(), Some(&json!([1, 2])));
        assert_eq!(response.field("user"), None);

        let numbers: Vec<u32> = response.clone().decode_data().unwrap();
        assert_eq!(numbers, vec![1, 2]);

        let empty = ApiResponse {
            status: 204,
            body: Value::Null,
        };
        assert_eq!(empty.into_data(), Value::Null);
    }
}
