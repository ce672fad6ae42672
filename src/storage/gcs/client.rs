//! GCS XML API client core
//!
//! Addresses the bucket path-style (`<endpoint>/<bucket>/<key>`) so the signed
//! resource and the public URL share one canonical form.

use crate::storage::gcs::acl::AclHeader;
use crate::storage::gcs::request::Response;
use crate::storage::gcs::signer::Signer;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, DATE, HOST};
use std::str::FromStr;

/// GCS client with HMAC interoperability credentials
#[derive(Debug, Clone)]
pub struct Client {
    access_id: String,
    secret: String,
    bucket: String,
    endpoint: String,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// - access_id: HMAC access id
    /// - secret: HMAC secret
    /// - bucket: bucket name
    /// - endpoint: API endpoint, e.g. https://storage.googleapis.com
    pub fn new(
        access_id: impl Into<String>,
        secret: impl Into<String>,
        bucket: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            access_id: access_id.into(),
            secret: secret.into(),
            bucket: bucket.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn get_bucket(&self) -> &str {
        &self.bucket
    }

    /// Host portion of the endpoint, used for the Host header
    pub fn get_host(&self) -> String {
        self.endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string()
    }

    /// Path-style resource for an object key: `/<bucket>/<key>`
    pub fn get_resource_for_key(&self, key: &str) -> String {
        format!("/{}/{}", self.bucket, key.trim_start_matches('/'))
    }

    /// Path-style resource for the bucket itself
    pub fn get_resource_for_bucket(&self) -> String {
        format!("/{}/", self.bucket)
    }

    /// Full URL for a resource path
    pub fn get_full_url(&self, resource: &str) -> String {
        format!("{}{}", self.endpoint, resource)
    }

    /// Public, unsigned URL of an object
    pub fn get_public_url(&self, key: &str) -> String {
        self.get_full_url(&self.get_resource_for_key(key))
    }

    /// Common request headers: Host and Date
    pub fn get_common_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(host) = HeaderValue::from_str(&self.get_host()) {
            headers.insert(HOST, host);
        }
        let now_str = Utc::now().format("%a, %d %b %Y %T GMT").to_string();
        if let Ok(date) = HeaderValue::from_str(&now_str) {
            headers.insert(DATE, date);
        }
        headers
    }

    /// Return headers carrying a GOOG1 Authorization for the request
    ///
    /// # Arguments
    /// - method: HTTP method
    /// - resource: path-style resource being addressed
    /// - acl_header: predefined ACL headers (optional)
    /// - origin_headers: headers assembled so far (optional)
    pub fn get_headers_with_auth(
        &self,
        method: &str,
        resource: &str,
        acl_header: Option<AclHeader>,
        origin_headers: Option<HeaderMap>,
    ) -> HeaderMap {
        let mut headers = origin_headers.unwrap_or_else(|| self.get_common_headers());

        if let Some(acl_header) = acl_header {
            for (k, v) in acl_header.get_headers() {
                if let (Ok(name), Ok(value)) =
                    (HeaderName::from_str(k), HeaderValue::from_str(v))
                {
                    headers.insert(name, value);
                }
            }
        }

        let authorization =
            Signer::new(method, resource, &headers).get_authorization(&self.access_id, &self.secret);
        if let Ok(value) = HeaderValue::from_str(&authorization) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Collapse the Ok/Err sides of a request into one response
    pub fn make_response(&self, resp: Result<Response, Response>) -> Response {
        resp.unwrap_or_else(|x| x)
    }
}
