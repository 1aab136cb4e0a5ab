//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs binding the customer id, username and role
//! set, with expiry as the only invalidation mechanism (no revocation list).
//! Verification is a pure function `token -> Principal | error` called once
//! per request by the security gate.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mercado_core::{CustomerId, Role};

/// Errors produced when issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is past its expiry instant.
    #[error("token expired")]
    Expired,
    /// Signature mismatch, malformed token, or unexpected claims.
    #[error("invalid token")]
    Invalid,
    /// Signing failed (should not happen with a valid secret).
    #[error("failed to sign token")]
    Signing,
}

/// The authenticated identity reconstructed from a request's token.
///
/// Not persisted - rebuilt per request from the validated claims.
#[derive(Debug, Clone)]
pub struct Principal {
    /// The customer this token was issued to.
    pub id: CustomerId,
    /// Username (the customer's email address).
    pub username: String,
    /// Roles granted to the account at token issuance.
    pub roles: HashSet<Role>,
}

impl Principal {
    /// Whether the principal holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// JWT claim set carried by Mercado bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Username (email).
    sub: String,
    /// Customer id.
    uid: i32,
    /// Granted roles.
    roles: Vec<Role>,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_secs: i64,
}

impl TokenService {
    /// Create a token service from the configured secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, expiration_secs: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            expiration_secs,
        }
    }

    /// Issue a signed, time-bounded token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn generate(
        &self,
        id: CustomerId,
        username: &str,
        roles: &HashSet<Role>,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_owned(),
            uid: id.as_i32(),
            roles: roles.iter().copied().collect(),
            iat: now,
            exp: now + self.expiration_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and reconstruct the principal it binds.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for a valid-but-stale token and
    /// `TokenError::Invalid` for anything else.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;

        let claims = data.claims;
        Ok(Principal {
            id: CustomerId::new(claims.uid),
            username: claims.sub,
            roles: claims.roles.into_iter().collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(ttl: i64) -> TokenService {
        TokenService::new(&SecretString::from("k9#mQ2$xV7!pL4@wZ8^rT3&yB6*nH1%d"), ttl)
    }

    fn roles(list: &[Role]) -> HashSet<Role> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_generate_verify_roundtrip() {
        let svc = service(3600);
        let token = svc
            .generate(CustomerId::new(5), "maria@gmail.com", &roles(&[Role::Customer]))
            .unwrap();

        let principal = svc.verify(&token).unwrap();
        assert_eq!(principal.id, CustomerId::new(5));
        assert_eq!(principal.username, "maria@gmail.com");
        assert!(principal.has_role(Role::Customer));
        assert!(!principal.has_role(Role::Admin));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative lifetime puts exp in the past; leeway is 60s by default,
        // so move it well past that.
        let svc = service(-120);
        let token = svc
            .generate(CustomerId::new(1), "maria@gmail.com", &roles(&[Role::Customer]))
            .unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service(3600);
        let token = svc
            .generate(CustomerId::new(1), "maria@gmail.com", &roles(&[Role::Customer]))
            .unwrap();

        let mut tampered = token;
        tampered.push('x');
        assert!(matches!(svc.verify(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = service(3600);
        let verifier = TokenService::new(
            &SecretString::from("w2@dF8#sG5$hJ1!kL7%mN4^pQ0&rS3*t"),
            3600,
        );

        let token = issuer
            .generate(CustomerId::new(1), "maria@gmail.com", &roles(&[Role::Admin]))
            .unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }
}
