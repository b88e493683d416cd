use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use catalog_common::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing material shared by the login route and the bearer extractor.
#[derive(Clone)]
pub struct AuthSettings {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in_secs: u64,
}

impl AuthSettings {
    pub fn new(secret: &str, expires_in_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in_secs,
        }
    }

    pub fn issue(&self, email: &str) -> CatalogResult<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_owned(),
            email: email.to_owned(),
            iat,
            exp: iat + self.expires_in_secs as i64,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CatalogError::Internal(format!("failed to sign token: {e}")))
    }

    /// Signature and expiry check.
    pub fn verify(&self, token: &str) -> CatalogResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| CatalogError::Unauthorized(format!("invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let auth = AuthSettings::new("secret", 60);
        let token = auth.issue("ana@example.com").expect("token");
        let claims = auth.verify(&token).expect("claims");
        assert_eq!(claims.sub, "ana@example.com");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = AuthSettings::new("one", 60).issue("a@b.c").expect("token");
        let err = AuthSettings::new("two", 60).verify(&token).unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = AuthSettings::new("secret", 60);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "a@b.c".to_owned(),
            email: "a@b.c".to_owned(),
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode");
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let auth = AuthSettings::new("secret", 60);
        assert!(auth.verify("not.a.jwt").is_err());
    }
}
