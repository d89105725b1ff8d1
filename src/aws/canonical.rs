//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};

/// Everything except the RFC 3986 unreserved characters is encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Headers that are never part of the signature even when present on the request.
const UNSIGNABLE_HEADERS: &[&str] = &[
    "authorization",
    "cache-control",
    "connection",
    "expect",
    "from",
    "keep-alive",
    "max-forwards",
    "pragma",
    "referer",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "x-amzn-trace-id",
];

/// Canonical header block plus the matching `SignedHeaders` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeaders {
    /// `name:value` lines joined by `\n`, no trailing newline
    pub canonical: String,
    /// Lower-cased names joined by `;`
    pub signed: String,
}

/// Build the full canonical request string from its components.
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &CanonicalHeaders,
    payload_hash: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n\n{}\n{}",
        method.to_uppercase(),
        build_canonical_uri(path),
        build_canonical_query_string(query),
        headers.canonical,
        headers.signed,
        payload_hash
    )
}

/// URI-encode each path segment; slashes are kept and an empty path becomes `/`.
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| uri_encode(&percent_decode_str(segment).decode_utf8_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Encode every key and value, then sort by key and value.
pub fn build_canonical_query_string(query: &str) -> String {
    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (k, v) = param.split_once('=').unwrap_or((param, ""));
            (
                uri_encode(&percent_decode_str(k).decode_utf8_lossy()),
                uri_encode(&percent_decode_str(v).decode_utf8_lossy()),
            )
        })
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Lower-case names, trim values and collapse inner whitespace, sort by name.
///
/// Repeated names are joined with `,`. Unsignable headers are skipped.
pub fn build_canonical_headers<'a, I>(headers: I) -> CanonicalHeaders
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut sorted: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let name = name.to_lowercase();
        if UNSIGNABLE_HEADERS.contains(&name.as_str()) {
            continue;
        }
        let value = collapse_whitespace(value.trim());
        sorted
            .entry(name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let canonical = sorted
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join("\n");
    let signed = sorted.keys().cloned().collect::<Vec<_>>().join(";");

    CanonicalHeaders { canonical, signed }
}

/// Hex-encoded SHA-256 of the payload
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_uri() {
        assert_eq!(build_canonical_uri(""), "/");
        assert_eq!(build_canonical_uri("/"), "/");
        assert_eq!(build_canonical_uri("/a b/c"), "/a%20b/c");
        assert_eq!(build_canonical_uri("/already%20encoded"), "/already%20encoded");
    }

    #[test]
    fn test_canonical_query_sorted() {
        assert_eq!(build_canonical_query_string(""), "");
        assert_eq!(build_canonical_query_string("b=2&a=1&a=0"), "a=0&a=1&b=2");
        assert_eq!(build_canonical_query_string("k=a b"), "k=a%20b");
    }

    #[test]
    fn test_canonical_headers_sorted_and_lowercased() {
        let headers = build_canonical_headers([
            ("X-Amz-Date", "20150830T123600Z"),
            ("Host", "  example.amazonaws.com "),
            ("Content-Type", "text/plain;   charset=utf-8"),
            ("User-Agent", "ignored"),
        ]);
        assert_eq!(
            headers.canonical,
            "content-type:text/plain; charset=utf-8\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z"
        );
        assert_eq!(headers.signed, "content-type;host;x-amz-date");
    }

    #[test]
    fn test_canonical_headers_join_duplicates() {
        let headers = build_canonical_headers([("X-Foo", "a"), ("x-foo", "b")]);
        assert_eq!(headers.canonical, "x-foo:a,b");
    }

    #[test]
    fn test_canonical_request_layout() {
        let headers = build_canonical_headers([
            ("Host", "example.amazonaws.com"),
            ("X-Amz-Date", "20150830T123600Z"),
        ]);
        let request = build_canonical_request("get", "/", "", &headers, &hash_payload(b""));
        assert_eq!(
            request,
            "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_payload() {
        assert_eq!(
            hash_payload(b"Action=GetCallerIdentity&Version=2011-06-15"),
            "ab821ae955788b0e33ebd34c208442ccfc2d406e2edc5e7a39bd6458fbb4f843"
        );
    }
}
