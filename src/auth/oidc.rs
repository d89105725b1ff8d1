//! OIDC Auth (identity id + runner-issued JWT)

use super::LoginCall;
use crate::models::SecretString;

pub const LOGIN_PATH: &str = "/api/v1/auth/oidc-auth/login";

/// Form body `identityId=...&jwt=...`
pub fn login_call(identity_id: &str, jwt: &SecretString) -> LoginCall {
    LoginCall::new(LOGIN_PATH)
        .field("identityId", identity_id)
        .field("jwt", jwt.expose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oidc_form_body() {
        let call = login_call("id-1", &SecretString::new("eyJ.payload.sig"));
        assert_eq!(call.path(), LOGIN_PATH);
        assert_eq!(call.encode().unwrap(), "identityId=id-1&jwt=eyJ.payload.sig");
    }
}
