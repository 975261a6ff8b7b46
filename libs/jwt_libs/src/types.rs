use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize)]
pub struct TokenClaims<T> {
    pub iat: i64,
    pub exp: i64,
    pub token: T,
}

/// Payload of the browser session cookie. `sid` keys the server-side record.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionToken {
    pub sid: Uuid,
    pub id: Uuid,
}
