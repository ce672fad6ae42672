//! Object operations: upload, download, delete, size probe

use crate::storage::gcs::acl::AclHeader;
use crate::storage::gcs::client::Client;
use crate::storage::gcs::request::{ErrNo, Request, Response};
use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

impl Client {
    /// Upload in-memory data as one object
    ///
    /// # Arguments
    /// - data: object bytes
    /// - key: object key
    /// - content_type: stored as object metadata
    /// - acl_header: predefined ACL for the new object
    pub async fn put_object_binary(
        &self,
        data: Bytes,
        key: &str,
        content_type: Option<mime::Mime>,
        acl_header: Option<AclHeader>,
    ) -> Response {
        let mut headers = self.get_common_headers();
        let content_type = content_type.unwrap_or(mime::APPLICATION_OCTET_STREAM);
        if let Ok(value) = HeaderValue::from_str(content_type.as_ref()) {
            headers.insert(CONTENT_TYPE, value);
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(data.len()));

        let resource = self.get_resource_for_key(key);
        let headers = self.get_headers_with_auth("put", &resource, acl_header, Some(headers));

        let resp = Request::put(&self.get_full_url(&resource), None, Some(&headers), data).await;
        self.make_response(resp)
    }

    /// Download one object
    pub async fn get_object_binary(&self, key: &str) -> Response {
        let resource = self.get_resource_for_key(key);
        let headers = self.get_headers_with_auth("get", &resource, None, None);

        let resp = Request::get(&self.get_full_url(&resource), None, Some(&headers)).await;
        self.make_response(resp)
    }

    /// Delete one object
    pub async fn delete_object(&self, key: &str) -> Response {
        let resource = self.get_resource_for_key(key);
        let headers = self.get_headers_with_auth("delete", &resource, None, None);

        let resp = Request::delete(&self.get_full_url(&resource), None, Some(&headers)).await;
        self.make_response(resp)
    }

    /// Object size in bytes; -1 means the object does not exist
    pub async fn get_object_size(&self, key: &str) -> i64 {
        let resource = self.get_resource_for_key(key);
        let headers = self.get_headers_with_auth("head", &resource, None, None);

        let resp = Request::head(&self.get_full_url(&resource), None, Some(&headers)).await;
        let resp = self.make_response(resp);

        if resp.error_no != ErrNo::Success {
            return -1;
        }

        resp.headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}
