//! Universal Auth (client id + client secret)

use super::LoginCall;
use crate::models::SecretString;

pub const LOGIN_PATH: &str = "/api/v1/auth/universal-auth/login";

/// Form body `clientId=...&clientSecret=...`
pub fn login_call(client_id: &str, client_secret: &SecretString) -> LoginCall {
    LoginCall::new(LOGIN_PATH)
        .field("clientId", client_id)
        .field("clientSecret", client_secret.expose())
}
