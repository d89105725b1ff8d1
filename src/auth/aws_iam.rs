//! AWS IAM Auth
//!
//! The caller proves its AWS identity by handing the identity service a signed
//! STS `GetCallerIdentity` request, which the service forwards to AWS. The
//! request is never sent from here.

use base64::Engine;
use chrono::{DateTime, Utc};

use super::LoginCall;
use crate::aws::{AwsCredentials, RequestSigner, SignedHttpRequest, UnsignedHttpRequest};
use crate::errors::Result;
use crate::models::HeaderMap;

pub const LOGIN_PATH: &str = "/api/v1/auth/aws-auth/login";
pub const STS_SERVICE: &str = "sts";
pub const STS_METHOD: &str = "POST";
pub const STS_BODY: &str = "Action=GetCallerIdentity&Version=2011-06-15";
pub const STS_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub fn sts_host(region: &str) -> String {
    format!("sts.{}.amazonaws.com", region)
}

/// Unsigned `POST https://sts.<region>.amazonaws.com/` for `GetCallerIdentity`
pub fn get_caller_identity_request(region: &str) -> UnsignedHttpRequest {
    let host = sts_host(region);
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type".to_string(), STS_CONTENT_TYPE.to_string());
    headers.insert("Host".to_string(), host.clone());
    headers.insert("Content-Length".to_string(), STS_BODY.len().to_string());

    UnsignedHttpRequest {
        method: STS_METHOD.to_string(),
        scheme: "https".to_string(),
        host,
        path: "/".to_string(),
        headers,
        body: STS_BODY.as_bytes().to_vec(),
    }
}

/// Build and sign the STS request at `time`.
pub fn sign_get_caller_identity(
    credentials: &AwsCredentials,
    region: &str,
    time: DateTime<Utc>,
) -> SignedHttpRequest {
    let signed = RequestSigner::new(credentials, region, STS_SERVICE)
        .sign(get_caller_identity_request(region), time);
    tracing::debug!(
        url = %signed.url(),
        amz_date = signed.header("x-amz-date").unwrap_or_default(),
        "Signed STS GetCallerIdentity request"
    );
    signed
}

/// Re-key any header named `authorization` (any case) to exactly `Authorization`.
///
/// Some HTTP stacks on the verifier side match outbound header names case-sensitively.
pub fn normalize_header_case(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .map(|(name, value)| {
            let name = if name.eq_ignore_ascii_case("authorization") {
                "Authorization".to_string()
            } else {
                name.clone()
            };
            (name, value.clone())
        })
        .collect()
}

/// Form body carrying the signed request, base64-encoded
pub fn login_call(identity_id: &str, signed: &SignedHttpRequest) -> Result<LoginCall> {
    let engine = base64::engine::general_purpose::STANDARD;
    let headers = normalize_header_case(&signed.headers);
    let headers_json = serde_json::to_string(&headers)?;

    Ok(LoginCall::new(LOGIN_PATH)
        .field("identityId", identity_id)
        .field("iamHttpRequestMethod", &signed.method)
        .field("iamRequestBody", &engine.encode(&signed.body))
        .field("iamRequestHeaders", &engine.encode(headers_json.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signed() -> SignedHttpRequest {
        let creds = AwsCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", None);
        let time = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        sign_get_caller_identity(&creds, "us-east-1", time)
    }

    #[test]
    fn test_sts_request_shape() {
        let request = get_caller_identity_request("eu-central-1");
        assert_eq!(request.method, "POST");
        assert_eq!(request.host, "sts.eu-central-1.amazonaws.com");
        assert_eq!(request.headers["Host"], "sts.eu-central-1.amazonaws.com");
        assert_eq!(request.headers["Content-Length"], "43");
        assert_eq!(request.body, STS_BODY.as_bytes());
    }

    #[test]
    fn test_normalize_header_case() {
        let mut headers = HeaderMap::new();
        headers.insert("AUTHORIZATION".to_string(), "sig".to_string());
        headers.insert("x-amz-date".to_string(), "20150830T123600Z".to_string());
        let normalized = normalize_header_case(&headers);
        assert_eq!(normalized.get("Authorization").map(String::as_str), Some("sig"));
        assert!(normalized.get("AUTHORIZATION").is_none());
        assert_eq!(normalized.get("x-amz-date").map(String::as_str), Some("20150830T123600Z"));
    }

    #[test]
    fn test_login_call_fields() {
        let signed = signed();
        let call = login_call("id-1", &signed).unwrap();
        assert_eq!(call.path(), LOGIN_PATH);

        let fields: HeaderMap = call.fields().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(fields["identityId"], "id-1");
        assert_eq!(fields["iamHttpRequestMethod"], "POST");

        let engine = base64::engine::general_purpose::STANDARD;
        let body = engine.decode(&fields["iamRequestBody"]).unwrap();
        assert_eq!(body, STS_BODY.as_bytes());

        let headers_json = engine.decode(&fields["iamRequestHeaders"]).unwrap();
        let headers: HeaderMap = serde_json::from_slice(&headers_json).unwrap();
        assert_eq!(headers["Host"], "sts.us-east-1.amazonaws.com");
        assert_eq!(headers["x-amz-date"], "20150830T123600Z");
        assert!(headers["Authorization"].starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(!headers.contains_key("authorization"));
    }
}
