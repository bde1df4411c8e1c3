use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use bookshelf_kernel::settings::{AuthSettings, MAX_TOKEN_TTL_MINUTES};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token")]
    Signing,
}

/// Claims carried by every access token. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self, reference: OffsetDateTime) -> bool {
        reference.unix_timestamp() >= self.exp
    }
}

/// Issues and verifies HS256 access tokens with a fixed time-to-live.
///
/// Verification checks the signature and the presence of `sub` and `exp`
/// first, then expiry exactly once, so a forged token is always reported as
/// [`TokenError::Invalid`] even when its `exp` is in the past.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        let minutes = settings.token_ttl_minutes.min(MAX_TOKEN_TTL_MINUTES);
        Self::new(
            settings.jwt_secret.as_bytes(),
            Duration::minutes(i64::try_from(minutes).unwrap_or(i64::MAX / 60)),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, subject: &str, now: OffsetDateTime) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: Some(now.unix_timestamp()),
            exp: now.saturating_add(self.ttl).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            tracing::error!(error = %err, "failed to sign access token");
            TokenError::Signing
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "access token rejected");
                TokenError::Invalid
            })?
            .claims;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    fn test_service() -> TokenService {
        TokenService::new(SECRET, Duration::minutes(30))
    }

    fn issued_at() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let service = test_service();
        let token = service.issue_at("johndoe", issued_at()).unwrap();

        let claims = service
            .verify_at(&token, issued_at() + Duration::minutes(5))
            .unwrap();
        assert_eq!(claims.sub, "johndoe");
        assert_eq!(claims.iat, Some(1_700_000_000));
        assert_eq!(claims.exp, 1_700_000_000 + 30 * 60);
    }

    #[test]
    fn token_is_valid_until_the_last_second() {
        let service = test_service();
        let token = service.issue_at("johndoe", issued_at()).unwrap();

        let almost = issued_at() + Duration::minutes(30) - Duration::seconds(1);
        assert!(service.verify_at(&token, almost).is_ok());
    }

    #[test]
    fn rejects_expired_token() {
        let service = test_service();
        let token = service.issue_at("johndoe", issued_at()).unwrap();

        assert_eq!(
            service.verify_at(&token, issued_at() + Duration::minutes(30)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            service.verify_at(&token, issued_at() + Duration::hours(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenService::new(b"someone-else", Duration::minutes(30));
        let token = other.issue_at("johndoe", issued_at()).unwrap();

        assert_eq!(
            test_service().verify_at(&token, issued_at()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn bad_signature_wins_over_expiry() {
        let other = TokenService::new(b"someone-else", Duration::minutes(30));
        let token = other.issue_at("johndoe", issued_at()).unwrap();

        assert_eq!(
            test_service().verify_at(&token, issued_at() + Duration::days(1)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn rejects_tampered_token() {
        let service = test_service();
        let token = service.issue_at("johndoe", issued_at()).unwrap();
        let forged_claims = service.issue_at("mallory", issued_at()).unwrap();

        // Splice the payload of one token onto the signature of another.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged_claims.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert_ne!(spliced, forged_claims);

        assert_eq!(
            service.verify_at(&spliced, issued_at()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn rejects_malformed_token() {
        let service = test_service();
        for token in ["", "not-a-token", "a.b.c"] {
            assert_eq!(
                service.verify_at(token, issued_at()),
                Err(TokenError::Invalid),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn rejects_token_without_subject() {
        #[derive(Serialize)]
        struct ExpiryOnly {
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &ExpiryOnly {
                exp: issued_at().unix_timestamp() + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            test_service().verify_at(&token, issued_at()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn accepts_token_without_issued_at() {
        #[derive(Serialize)]
        struct SubjectAndExpiry {
            sub: &'static str,
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &SubjectAndExpiry {
                sub: "johndoe",
                exp: issued_at().unix_timestamp() + 600,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let claims = test_service().verify_at(&token, issued_at()).unwrap();
        assert_eq!(claims.sub, "johndoe");
        assert_eq!(claims.iat, None);
        assert_eq!(
            test_service().verify_at(&token, issued_at() + Duration::minutes(10)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_other_algorithm() {
        let claims = Claims {
            sub: "johndoe".to_string(),
            iat: Some(issued_at().unix_timestamp()),
            exp: issued_at().unix_timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            test_service().verify_at(&token, issued_at()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn ttl_comes_from_settings() {
        let settings = AuthSettings {
            token_ttl_minutes: 5,
            ..AuthSettings::default()
        };
        assert_eq!(TokenService::from_settings(&settings).ttl(), Duration::minutes(5));
    }

    #[test]
    fn oversized_ttl_is_capped() {
        let settings = AuthSettings {
            token_ttl_minutes: u64::MAX,
            ..AuthSettings::default()
        };
        let service = TokenService::from_settings(&settings);
        let cap = i64::try_from(MAX_TOKEN_TTL_MINUTES).unwrap();
        assert_eq!(service.ttl(), Duration::minutes(cap));
        assert!(service.issue_at("johndoe", issued_at()).is_ok());
    }
}
