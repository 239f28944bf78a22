// JWT issuance and verification

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::{
    error::AuthError,
    models::{parse_roles, Role},
};
use crate::config::AuthConfig;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,       // username
    #[serde(default)]
    pub roles: Vec<String>,
    pub iat: i64,          // issued at timestamp
    pub exp: i64,          // expiration timestamp
}

/// A freshly signed token together with what it asserts
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub subject: String,
    pub roles: BTreeSet<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a token that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub roles: BTreeSet<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Token service for JWT operations (HS256, shared secret)
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    structure: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        // Same claim rules without the HMAC check, for telling garbage apart from forgeries
        let mut structure = validation.clone();
        structure.insecure_disable_signature_validation();

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
            structure,
            ttl: config.token_ttl(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid for the configured TTL starting now
    pub fn issue(&self, subject: &str, roles: BTreeSet<Role>) -> Result<IssuedToken, AuthError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issue a token as of `now`; timestamps are truncated to whole seconds
    pub fn issue_at(
        &self,
        subject: &str,
        roles: BTreeSet<Role>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let iat = now.timestamp();
        let exp = iat + self.ttl.num_seconds();

        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.iter().map(|role| role.as_str().to_string()).collect(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        let out_of_range = || AuthError::TokenGeneration("timestamp out of range".to_string());
        Ok(IssuedToken {
            token,
            subject: claims.sub,
            roles,
            issued_at: DateTime::from_timestamp(iat, 0).ok_or_else(out_of_range)?,
            expires_at: DateTime::from_timestamp(exp, 0).ok_or_else(out_of_range)?,
        })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify structure, signature and expiry as of `now`
    ///
    /// A token is valid strictly before its `exp` instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, AuthError> {
        // jsonwebtoken checks the HMAC before parsing the payload, so parse first
        decode::<Claims>(token, &self.decoding_key, &self.structure)
            .map_err(|_| AuthError::MalformedToken)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::MalformedToken,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        Ok(VerifiedToken {
            roles: parse_roles(&claims.roles),
            issued_at: DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::MalformedToken)?,
            expires_at: DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?,
            subject: claims.sub,
        })
    }

    /// True iff the token verifies and was issued for exactly `expected_username`
    pub fn matches_subject(&self, token: &str, expected_username: &str) -> bool {
        matches!(self.verify(token), Ok(verified) if verified.subject == expected_username)
    }
}

#[cfg(test)]
pub(crate) fn test_auth_config() -> AuthConfig {
    AuthConfig::new("test_secret_key_for_testing_purposes", Duration::seconds(3600))
        .expect("valid test config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(&test_auth_config())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_alice_token_lifecycle() {
        let service = test_token_service();
        let issued = service
            .issue_at("alice", BTreeSet::from([Role::Admin]), t0())
            .unwrap();

        let verified = service
            .verify_at(&issued.token, t0() + Duration::seconds(10))
            .unwrap();
        assert_eq!(verified.subject, "alice");
        assert_eq!(verified.roles, BTreeSet::from([Role::Admin]));

        let late = service.verify_at(&issued.token, t0() + Duration::seconds(3601));
        assert!(matches!(late, Err(AuthError::Expired)));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let service = test_token_service();
        let issued = service.issue_at("bob", BTreeSet::new(), t0()).unwrap();

        assert!(service
            .verify_at(&issued.token, t0() + Duration::seconds(3599))
            .is_ok());
        assert!(matches!(
            service.verify_at(&issued.token, t0() + Duration::seconds(3600)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_expires_at_is_issued_at_plus_ttl() {
        let service = test_token_service();
        let issued = service.issue("carol", BTreeSet::from([Role::Seller])).unwrap();
        assert_eq!(issued.expires_at - issued.issued_at, Duration::seconds(3600));

        let verified = service.verify(&issued.token).unwrap();
        assert_eq!(verified.issued_at, issued.issued_at);
        assert_eq!(verified.expires_at, issued.expires_at);
    }

    #[test]
    fn test_issuance_is_deterministic_for_same_instant() {
        let service = test_token_service();
        let roles = BTreeSet::from([Role::Support, Role::Admin]);
        let first = service.issue_at("dave", roles.clone(), t0()).unwrap();
        let second = service.issue_at("dave", roles, t0()).unwrap();
        assert_eq!(first.token, second.token);

        let later = service
            .issue_at("dave", first.roles.clone(), t0() + Duration::seconds(1))
            .unwrap();
        assert_ne!(first.token, later.token);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for token in [
            "",
            "not.a.token",
            "invalid_token_format",
            "a.b.c.d",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ] {
            assert!(
                matches!(service.verify(token), Err(AuthError::MalformedToken)),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_unparsable_payload_is_malformed_not_forged() {
        let service = test_token_service();
        let header = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

        // not base64, base64 of non-JSON, JSON missing `sub`
        for payload in ["invalid", "bm90IGpzb24", "eyJleHAiOjQxMDI0NDQ4MDB9"] {
            let token = format!("{}.{}.signature", header, payload);
            assert!(
                matches!(service.verify(&token), Err(AuthError::MalformedToken)),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_token_signature_verification() {
        let other = TokenService::new(
            &AuthConfig::new("a-different-secret", Duration::seconds(3600)).unwrap(),
        );
        let token = other.issue("mallory", BTreeSet::from([Role::Admin])).unwrap().token;

        assert!(other.verify(&token).is_ok());
        assert!(matches!(
            test_token_service().verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_every_single_byte_mutation_is_rejected() {
        let service = test_token_service();
        let token = service
            .issue("alice", BTreeSet::from([Role::Seller]))
            .unwrap()
            .token;

        for index in 0..token.len() {
            let original = token.as_bytes()[index];
            for replacement in [b'A', b'x', b'0', b'-', b'.', b'='] {
                if replacement == original {
                    continue;
                }
                let mut bytes = token.clone().into_bytes();
                bytes[index] = replacement;
                let mutated = String::from_utf8(bytes).unwrap();

                let result = service.verify(&mutated);
                assert!(
                    matches!(
                        result,
                        Err(AuthError::InvalidSignature) | Err(AuthError::MalformedToken)
                    ),
                    "mutation at {index} to {:?} gave {:?}",
                    replacement as char,
                    result
                );
            }
        }
    }

    #[test]
    fn test_empty_subject_is_malformed() {
        let service = test_token_service();
        let token = service.issue("", BTreeSet::new()).unwrap().token;
        assert!(matches!(service.verify(&token), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn test_unknown_role_claims_are_dropped() {
        let claims = Claims {
            sub: "erin".to_string(),
            roles: vec!["SELLER".to_string(), "ROOT".to_string()],
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_for_testing_purposes"),
        )
        .unwrap();

        let verified = test_token_service().verify(&token).unwrap();
        assert_eq!(verified.roles, BTreeSet::from([Role::Seller]));
    }

    #[test]
    fn test_other_algorithms_are_rejected() {
        let claims = Claims {
            sub: "frank".to_string(),
            roles: vec![],
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_for_testing_purposes"),
        )
        .unwrap();

        assert!(matches!(
            test_token_service().verify(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_matches_subject_is_exact() {
        let service = test_token_service();
        let token = service.issue("Alice", BTreeSet::new()).unwrap().token;

        assert!(service.matches_subject(&token, "Alice"));
        assert!(!service.matches_subject(&token, "alice"));
        assert!(!service.matches_subject(&token, "Alice "));
        assert!(!service.matches_subject("garbage", "Alice"));
    }

    // Property-based tests using proptest

    proptest! {
        #[test]
        fn prop_subject_and_roles_survive_verification(
            subject in "[a-zA-Z0-9_]{1,50}",
            role_mask in 0u8..16
        ) {
            let service = test_token_service();
            let roles: BTreeSet<Role> = Role::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| role_mask & (1 << i) != 0)
                .map(|(_, role)| *role)
                .collect();

            let issued = service.issue(&subject, roles.clone())?;
            let verified = service.verify(&issued.token)?;
            prop_assert_eq!(verified.subject, subject);
            prop_assert_eq!(verified.roles, roles);
        }

        #[test]
        fn prop_lifetime_equals_configured_ttl(
            subject in "[a-z]{3,12}",
            offset in 0i64..1_000_000
        ) {
            let service = test_token_service();
            let now = t0() + Duration::seconds(offset);
            let issued = service.issue_at(&subject, BTreeSet::new(), now)?;
            prop_assert_eq!(issued.expires_at - issued.issued_at, service.ttl());
            prop_assert!(service.verify_at(&issued.token, issued.expires_at - Duration::seconds(1)).is_ok());
            prop_assert!(matches!(
                service.verify_at(&issued.token, issued.expires_at),
                Err(AuthError::Expired)
            ));
        }

        #[test]
        fn prop_random_strings_are_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.verify(&malformed).is_err());
        }
    }
}
