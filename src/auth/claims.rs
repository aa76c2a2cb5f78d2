// src/auth/claims.rs
// Credential claims, roles, and the identity derived from them

use crate::error::{Result, TrackerError};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three account kinds the backend issues tokens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Teacher,
    Parent,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Teacher, Role::Parent, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Parent => "PARENT",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TEACHER" => Ok(Role::Teacher),
            "PARENT" => Ok(Role::Parent),
            "STUDENT" => Ok(Role::Student),
            other => Err(TrackerError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Claims carried inside the credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Account id; issued as a string by the backend, accepted either way
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    pub role: Role,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl Claims {
    /// Expired iff `exp * 1000 <= now_ms`
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.exp.saturating_mul(1000) <= now_ms
    }
}

fn flexible_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric id '{}'", s))),
    }
}

/// Read-only projection of a valid credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub id: i64,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            id: claims.id,
            role: claims.role,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}, {})", self.username, self.id, self.role)
    }
}

/// Decode claims without checking the signature.
///
/// This is a client-side read of a token the backend issued; the backend
/// still verifies the signature on every request, so nothing here may be
/// used to authorize a sensitive action.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Decode and check expiry against `now_ms`
pub fn identity_from_token(token: &str, now_ms: i64) -> Result<Identity> {
    let claims = decode_claims(token)?;
    if claims.is_expired_at(now_ms) {
        return Err(TrackerError::ExpiredToken {
            expired_at: claims.exp,
        });
    }
    Ok(claims.into())
}

/// Wall clock in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn sign(payload: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    // ========================================================================
    // Role
    // ========================================================================

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("teacher".parse::<Role>().is_err());
        assert!("ADMIN".parse::<Role>().is_err());
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    #[test]
    fn test_decode_numeric_id() {
        let token = sign(&json!({"sub": "alice", "id": 7, "role": "TEACHER", "exp": 4102444800i64}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role, Role::Teacher);
    }

    #[test]
    fn test_decode_string_id_as_issued_by_backend() {
        let token = sign(&json!({"sub": "budi", "id": "42", "role": "PARENT", "exp": 4102444800i64, "iat": 1}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Parent);
    }

    #[test]
    fn test_signature_is_not_checked() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "s", "id": 1, "role": "STUDENT", "exp": 4102444800i64}),
            &EncodingKey::from_secret(b"some other secret entirely"),
        )
        .unwrap();
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let cases = [
            "".to_string(),
            "not-a-token".to_string(),
            "a.b".to_string(),
            "a.b.c".to_string(),
            sign(&json!({"sub": "x", "id": 1, "role": "JANITOR", "exp": 4102444800i64})),
            sign(&json!({"sub": "x", "id": "seven", "role": "STUDENT", "exp": 4102444800i64})),
            sign(&json!({"sub": "x", "id": 1, "role": "STUDENT"})),
            sign(&json!({"id": 1, "role": "STUDENT", "exp": 4102444800i64})),
        ];
        for token in cases {
            let err = decode_claims(&token).unwrap_err();
            assert!(
                matches!(err, TrackerError::InvalidToken(_)),
                "expected InvalidToken for {:?}, got {:?}",
                token,
                err
            );
        }
    }

    // ========================================================================
    // Expiry
    // ========================================================================

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims {
            sub: "a".into(),
            id: 1,
            role: Role::Student,
            exp: 1_000,
        };
        assert!(claims.is_expired_at(1_000_000));
        assert!(claims.is_expired_at(1_000_001));
        assert!(!claims.is_expired_at(999_999));
    }

    #[test]
    fn test_identity_from_token() {
        let token = sign(&json!({"sub": "alice", "id": 7, "role": "TEACHER", "exp": 2_000}));
        let identity = identity_from_token(&token, 1_999_999).unwrap();
        assert_eq!(
            identity,
            Identity {
                username: "alice".into(),
                id: 7,
                role: Role::Teacher
            }
        );

        let err = identity_from_token(&token, 2_000_000).unwrap_err();
        assert!(matches!(err, TrackerError::ExpiredToken { expired_at: 2_000 }));
    }
}
