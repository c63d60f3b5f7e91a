use std::fmt;

use console_logging::{console_debug, console_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{FailureKind, TransportError, TransportSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// `params` end up in the query string, `data` in a JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub params: Option<Value>,
    pub data: Option<Value>,
}

impl RequestOptions {
    pub fn params(params: Value) -> Self {
        Self {
            params: Some(params),
            data: None,
        }
    }

    pub fn data(data: Value) -> Self {
        Self {
            params: None,
            data: Some(data),
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange and returns the parsed response body.
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError>;
}

/// Runs a request and decodes the body into `T`.
pub async fn request_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    method: Method,
    url: &str,
    options: RequestOptions,
) -> Result<T, TransportError> {
    let body = transport.request(method, url, options).await?;
    serde_json::from_value(body)
        .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, TransportError> {
    serde_json::to_value(value)
        .map_err(|err| TransportError::new(FailureKind::Encode, err.to_string()))
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        let mut parsed = Url::parse(url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if let Some(params) = options.params.as_ref() {
            append_query(&mut parsed, params)?;
        }

        console_debug!("{} {}", method, parsed);
        let mut builder = self
            .client
            .request(method.as_reqwest(), parsed)
            .header(ACCEPT, "application/json");
        if let Some(data) = options.data.as_ref() {
            let body = serde_json::to_vec(data)
                .map_err(|err| TransportError::new(FailureKind::Encode, err.to_string()))?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            console_warn!("{} {} failed with {}", method, url, status);
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))
    }
}

fn append_query(url: &mut Url, params: &Value) -> Result<(), TransportError> {
    let Value::Object(fields) = params else {
        return Err(TransportError::new(
            FailureKind::Encode,
            "query params must be a JSON object",
        ));
    };
    let mut pairs = url.query_pairs_mut();
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::String(text) => {
                pairs.append_pair(key, text);
            }
            other => {
                pairs.append_pair(key, &other.to_string());
            }
        }
    }
    drop(pairs);
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(())
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_skips_nulls_and_stringifies_scalars() {
        let mut url = Url::parse("http://host/api/sysJobs/list").unwrap();
        append_query(
            &mut url,
            &json!({"pageNum": 2, "name": "nightly sync", "status": null, "active": true}),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("pageNum".into(), "2".into())));
        assert!(pairs.contains(&("name".into(), "nightly sync".into())));
        assert!(pairs.contains(&("active".into(), "true".into())));
        assert!(!pairs.iter().any(|(key, _)| key == "status"));
    }

    #[test]
    fn query_rejects_non_object_params() {
        let mut url = Url::parse("http://host/").unwrap();
        let err = append_query(&mut url, &json!([1, 2])).unwrap_err();
        assert_eq!(err.kind, FailureKind::Encode);
    }

    #[test]
    fn empty_params_leave_no_dangling_question_mark() {
        let mut url = Url::parse("http://host/api/sysJobs/executors").unwrap();
        append_query(&mut url, &json!({})).unwrap();
        assert_eq!(url.as_str(), "http://host/api/sysJobs/executors");
    }
}
