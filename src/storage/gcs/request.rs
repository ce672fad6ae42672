//! Thin HTTP wrapper for the object storage XML API

use reqwest::header::HeaderMap;
use reqwest::Body;
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;

// Outbound requests carry at most one photo; default HTTP timeouts are
// too short for slow uplinks, 5 minutes is plenty.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Error discriminant for storage API calls
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrNo {
    Success,
    Status,
    Connect,
    Decode,
    Other,
}

impl Display for ErrNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Raw result of a storage API call
#[derive(Debug, Clone)]
pub struct Response {
    pub error_no: ErrNo,
    pub error_message: String,
    /// Response body
    pub result: Vec<u8>,
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
}

impl From<reqwest::Error> for Response {
    fn from(value: reqwest::Error) -> Self {
        let mut e = ErrNo::Other;
        if value.is_status() {
            e = ErrNo::Status;
        } else if value.is_connect() {
            e = ErrNo::Connect;
        } else if value.is_decode() {
            e = ErrNo::Decode;
        }
        Response {
            error_no: e,
            error_message: value.to_string(),
            result: Vec::new(),
            headers: HashMap::new(),
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            error_no: ErrNo::Success,
            error_message: String::new(),
            result: Vec::new(),
            headers: HashMap::new(),
        }
    }
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.error_no == ErrNo::Success
    }

    pub fn is_not_found(&self) -> bool {
        self.error_no == ErrNo::Status && self.error_message.contains("404")
    }
}

#[derive(Debug, Eq, PartialEq)]
enum Method {
    Get,
    Put,
    Delete,
    Head,
}

/// HTTP request helper
pub struct Request;

impl Request {
    pub async fn head(
        url: &str,
        query: Option<&HashMap<String, String>>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Response> {
        Request::do_req(Method::Head, url, query, headers, None).await
    }

    pub async fn get(
        url: &str,
        query: Option<&HashMap<String, String>>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Response> {
        Request::do_req(Method::Get, url, query, headers, None).await
    }

    pub async fn put<T: Into<Body>>(
        url: &str,
        query: Option<&HashMap<String, String>>,
        headers: Option<&HeaderMap>,
        body: T,
    ) -> Result<Response, Response> {
        Request::do_req(Method::Put, url, query, headers, Some(body.into())).await
    }

    pub async fn delete(
        url: &str,
        query: Option<&HashMap<String, String>>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Response> {
        Request::do_req(Method::Delete, url, query, headers, None).await
    }

    async fn do_req(
        method: Method,
        url: &str,
        query: Option<&HashMap<String, String>>,
        headers: Option<&HeaderMap>,
        body: Option<Body>,
    ) -> Result<Response, Response> {
        let mut builder = reqwest::ClientBuilder::new().timeout(REQUEST_TIMEOUT);
        if let Some(headers) = headers {
            builder = builder.default_headers(headers.clone());
        }
        let client = builder.build()?;

        let mut req = match method {
            Method::Get => client.get(url),
            Method::Put => client.put(url),
            Method::Delete => client.delete(url),
            Method::Head => client.head(url),
        };

        if let Some(v) = query {
            req = req.query(v);
        }
        if let Some(v) = body {
            req = req.body(v);
        }

        let resp = req.send().await?;
        let status_code = resp.status();
        let mut error_no = ErrNo::Success;
        let mut message = String::new();

        if status_code.is_client_error() || status_code.is_server_error() {
            error_no = ErrNo::Status;
            message = status_code.to_string();
        }

        let mut headers = HashMap::new();
        for (k, v) in resp.headers() {
            headers.insert(k.to_string(), String::from_utf8_lossy(v.as_bytes()).into());
        }

        Ok(Response {
            error_no,
            error_message: message,
            result: resp.bytes().await?.to_vec(),
            headers,
        })
    }
}
