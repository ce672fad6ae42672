//! GOOG1 request signing for the GCS XML interoperability API
//!
//! HMAC-SHA1 over the canonical request description:
//!
//! ```text
//! VERB \n Content-MD5 \n Content-Type \n Date \n
//! <canonicalized x-goog-* headers> <canonicalized resource>
//! ```
//!
//! Reference: https://cloud.google.com/storage/docs/authentication/signatures

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Signer for one request
pub struct Signer<'a> {
    method: &'a str,
    /// Path-style resource: `/<bucket>` or `/<bucket>/<key>`
    resource: &'a str,
    headers: &'a HeaderMap,
}

impl<'a> Signer<'a> {
    pub fn new(method: &'a str, resource: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            resource,
            headers,
        }
    }

    fn header_value(&self, name: &str) -> String {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    }

    /// Lowercased `x-goog-*` headers, sorted by name, one `name:value` per line
    fn canonical_extension_headers(&self) -> String {
        let mut pairs: Vec<(String, String)> = self
            .headers
            .iter()
            .filter_map(|(k, v)| {
                let name = k.as_str().to_lowercase();
                if name.starts_with("x-goog-") {
                    Some((name, v.to_str().unwrap_or("").trim().to_string()))
                } else {
                    None
                }
            })
            .collect();
        pairs.sort();

        pairs
            .into_iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect()
    }

    fn string_to_sign(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}{}",
            self.method.to_uppercase(),
            self.header_value("content-md5"),
            self.header_value("content-type"),
            self.header_value("date"),
            self.canonical_extension_headers(),
            self.resource,
        )
    }

    /// Build the `Authorization` header value
    pub fn get_authorization(&self, access_id: &str, secret: &str) -> String {
        let mut mac =
            HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(self.string_to_sign().as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        format!("GOOG1 {}:{}", access_id, signature)
    }
}
