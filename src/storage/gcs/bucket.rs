//! Bucket operations: object listing and existence probe

use crate::storage::gcs::client::Client;
use crate::storage::gcs::request::{ErrNo, Request, Response};
use serde::Deserialize;
use std::collections::HashMap;

/// Parsed `ListBucketResult` XML
#[derive(Debug, Deserialize, PartialEq)]
pub struct ListBucketResult {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Prefix", default)]
    pub prefix: String,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker", default)]
    pub next_marker: String,
    #[serde(rename = "Contents", default)]
    pub contents: Vec<ListEntry>,
}

impl ListBucketResult {
    /// Marker to resume from when the listing was cut short, or None when
    /// this page is the last one
    pub fn next_page_start(&self) -> Option<String> {
        if !self.is_truncated {
            return None;
        }
        if !self.next_marker.is_empty() {
            return Some(self.next_marker.clone());
        }
        // Some servers omit NextMarker; resume after the last returned key
        self.contents.last().map(|entry| entry.key.clone())
    }
}

/// One `<Contents>` element of a listing
#[derive(Debug, Deserialize, PartialEq)]
pub struct ListEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Size")]
    pub size: u64,
    #[serde(rename = "LastModified", default)]
    pub last_modified: String,
}

impl Client {
    /// List one page of objects in the bucket
    ///
    /// # Arguments
    /// - prefix: object key prefix
    /// - max_keys: cap on returned entries per page
    /// - marker: resume after this key (from a previous truncated page)
    pub async fn list_objects(
        &self,
        prefix: Option<&str>,
        max_keys: Option<u32>,
        marker: Option<&str>,
    ) -> Result<ListBucketResult, Response> {
        let mut query = HashMap::new();
        if let Some(prefix) = prefix {
            query.insert("prefix".to_string(), prefix.to_string());
        }
        if let Some(max_keys) = max_keys {
            query.insert("max-keys".to_string(), max_keys.to_string());
        }
        if let Some(marker) = marker {
            query.insert("marker".to_string(), marker.to_string());
        }

        let resource = self.get_resource_for_bucket();
        let headers = self.get_headers_with_auth("get", &resource, None, None);

        let resp = Request::get(
            &self.get_full_url(&resource),
            if query.is_empty() { None } else { Some(&query) },
            Some(&headers),
        )
        .await;
        let resp = self.make_response(resp);

        if resp.error_no != ErrNo::Success {
            return Err(resp);
        }

        quick_xml::de::from_reader::<&[u8], ListBucketResult>(&resp.result[..]).map_err(|e| {
            Response {
                error_no: ErrNo::Decode,
                error_message: e.to_string(),
                result: Vec::new(),
                headers: HashMap::new(),
            }
        })
    }

    /// Check that the bucket is reachable with the configured credentials
    pub async fn bucket_exists(&self) -> bool {
        let resource = self.get_resource_for_bucket();
        let headers = self.get_headers_with_auth("head", &resource, None, None);

        let resp = Request::head(&self.get_full_url(&resource), None, Some(&headers)).await;
        self.make_response(resp).is_success()
    }
}
