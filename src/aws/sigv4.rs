//! AWS Signature Version 4 request signing
//!
//! Signing is a pure function of the credentials, region, service, unsigned
//! request and timestamp: callers pass the clock reading in, so identical inputs
//! produce byte-identical output.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::canonical::{build_canonical_headers, build_canonical_request, hash_payload};
use super::credentials::AwsCredentials;
use crate::models::HeaderMap;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const AMZ_DATE_HEADER: &str = "x-amz-date";
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// A request description prior to signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedHttpRequest {
    pub method: String,
    pub scheme: String,
    pub host: String,
    /// Path, optionally followed by `?query`
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The same request with `x-amz-date`, optional `x-amz-security-token`
/// and `authorization` added to its headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHttpRequest {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl SignedHttpRequest {
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// SigV4 signer bound to one credential set, region and service
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    credentials: &'a AwsCredentials,
    region: &'a str,
    service: &'a str,
}

impl<'a> RequestSigner<'a> {
    pub fn new(credentials: &'a AwsCredentials, region: &'a str, service: &'a str) -> Self {
        Self { credentials, region, service }
    }

    pub fn sign(&self, request: UnsignedHttpRequest, time: DateTime<Utc>) -> SignedHttpRequest {
        let amz_date = time.format("%Y%m%dT%H%M%SZ").to_string();
        let date = time.format("%Y%m%d").to_string();

        let mut headers = request.headers;
        headers.retain(|name, _| {
            !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
                && !name.eq_ignore_ascii_case(AMZ_DATE_HEADER)
                && !name.eq_ignore_ascii_case(SECURITY_TOKEN_HEADER)
        });
        if !headers.keys().any(|name| name.eq_ignore_ascii_case("host")) {
            headers.insert("host".to_string(), request.host.clone());
        }
        headers.insert(AMZ_DATE_HEADER.to_string(), amz_date.clone());
        if let Some(token) = &self.credentials.session_token {
            headers.insert(SECURITY_TOKEN_HEADER.to_string(), token.expose().to_string());
        }

        let (path, query) = request
            .path
            .split_once('?')
            .unwrap_or((request.path.as_str(), ""));

        let canonical_headers =
            build_canonical_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let canonical_request = build_canonical_request(
            &request.method,
            path,
            query,
            &canonical_headers,
            &hash_payload(&request.body),
        );

        let scope = credential_scope(&date, self.region, self.service);
        let string_to_sign =
            build_string_to_sign(&amz_date, &scope, &hash_payload(canonical_request.as_bytes()));
        let signing_key = derive_signing_key(
            self.credentials.secret_access_key.expose(),
            &date,
            self.region,
            self.service,
        );
        let signature = compute_signature(&signing_key, &string_to_sign);

        tracing::debug!(
            region = self.region,
            service = self.service,
            signed_headers = %canonical_headers.signed,
            "Signed AWS request"
        );

        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.credentials.access_key_id, scope, canonical_headers.signed, signature
            ),
        );

        SignedHttpRequest {
            method: request.method,
            scheme: request.scheme,
            host: request.host,
            path: request.path,
            headers,
            body: request.body,
        }
    }
}

/// `date/region/service/aws4_request`
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date, region, service)
}

pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{}\n{}\n{}\n{}", ALGORITHM, timestamp, credential_scope, canonical_request_hash)
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
