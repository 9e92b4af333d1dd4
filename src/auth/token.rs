use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::AuthConfig;

/// JWT payload: the account email as subject plus the absolute expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues and validates stateless bearer tokens signed with HS256.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            ttl: Duration::minutes(cfg.token_ttl_minutes),
        }
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + ttl;
        let claims = Claims {
            sub: subject.to_owned(),
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject, "token issued");
        Ok(token)
    }

    /// Returns the subject claim, or `None` on any failure. Malformed input,
    /// a bad signature and an expired token are indistinguishable here; the
    /// expiry check allows no clock-skew leeway.
    pub fn validate(&self, token: &str) -> Option<String> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(subject = %data.claims.sub, "token verified");
                Some(data.claims.sub)
            }
            Err(e) => {
                debug!(error = %e, "token rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::for_tests())
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let tokens = service();
        let token = tokens.issue("a@x.com").expect("issue");
        assert_eq!(tokens.validate(&token).as_deref(), Some("a@x.com"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl("a@x.com", Duration::seconds(-5))
            .expect("issue");
        assert_eq!(tokens.validate(&token), None);
    }

    #[test]
    fn tampered_payload_fails_validation() {
        let tokens = service();
        let token = tokens.issue("a@x.com").expect("issue");

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        assert_eq!(parts.len(), 3);
        // Flip one character inside the claims segment; the signature no
        // longer matches the payload.
        let payload = &mut parts[1];
        let original = payload.remove(0);
        let replacement = if original == 'A' { 'B' } else { 'A' };
        payload.insert(0, replacement);
        let tampered = parts.join(".");

        assert_ne!(tampered, token);
        assert_eq!(tokens.validate(&tampered), None);
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let tokens = service();
        let mut other_cfg = AuthConfig::for_tests();
        other_cfg.jwt_secret = "a-different-secret".into();
        let other = TokenService::new(&other_cfg);

        let token = tokens.issue("a@x.com").expect("issue");
        assert_eq!(other.validate(&token), None);
    }

    #[test]
    fn garbage_input_is_rejected() {
        let tokens = service();
        assert_eq!(tokens.validate(""), None);
        assert_eq!(tokens.validate("not.a.jwt"), None);
        assert_eq!(tokens.validate("header-only"), None);
    }
}
