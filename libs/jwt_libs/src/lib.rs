use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Error as JwtError, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

pub mod types;

use types::{SessionToken, TokenClaims};

impl<T: Serialize> TokenClaims<T> {
    pub fn generate_token(data: T, secret: &str, duration: Duration) -> Result<String, String> {
        let iat = Utc::now().timestamp();
        let exp = (Utc::now() + duration).timestamp();

        let claims = TokenClaims { iat, exp, token: data };
        let jwt_secret = EncodingKey::from_secret(secret.as_bytes());
        encode(&Header::default(), &claims, &jwt_secret).map_err(|e| e.to_string())
    }
}

pub fn decode_token<T>(token: &str, secret: &str) -> Result<TokenData<TokenClaims<T>>, String>
where
    T: for<'de> Deserialize<'de>,
{
    decode::<TokenClaims<T>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e: JwtError| e.to_string())
}

pub fn generate_session_token(data: SessionToken, secret: &str, ttl_seconds: i64) -> Result<String, String> {
    TokenClaims::<SessionToken>::generate_token(data, secret, Duration::seconds(ttl_seconds))
}

pub fn decode_session_token(token: &str, secret: &str) -> Result<SessionToken, String> {
    decode_token::<SessionToken>(token, secret).map(|data| data.claims.token)
}
