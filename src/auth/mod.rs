use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Authenticated caller as seen by access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub is_superuser: bool,
}

impl Identity {
    /// A regular, non-superuser identity.
    pub fn user(id: Uuid) -> Self {
        Self { id, is_superuser: false }
    }
}

/// Token claims issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub exp: i64,
    pub iat: i64,
}

/// Free-form metadata blob. Providers store the superuser flag either as a
/// JSON boolean or as the exact string "true"/"false".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<Value>,
}

impl UserMetadata {
    pub fn superuser(flag: bool) -> Self {
        Self { is_superuser: Some(Value::Bool(flag)) }
    }

    /// Anything other than `true` or `"true"` is `false`.
    pub fn superuser_flag(&self) -> bool {
        match &self.is_superuser {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }
}

impl Claims {
    pub fn new(user_id: Uuid, email: Option<String>, is_superuser: bool, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            user_metadata: UserMetadata::superuser(is_superuser),
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub,
            is_superuser: self.user_metadata.superuser_flag(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry. `audience` is checked only when configured.
pub fn validate_jwt(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn metadata(value: Value) -> UserMetadata {
        serde_json::from_value(json!({ "is_superuser": value })).unwrap()
    }

    #[test]
    fn superuser_flag_accepts_bool_and_string() {
        assert!(metadata(json!(true)).superuser_flag());
        assert!(metadata(json!("true")).superuser_flag());
        assert!(!metadata(json!(" TRUE ")).superuser_flag());
        assert!(!metadata(json!("True")).superuser_flag());
        assert!(!metadata(json!("true ")).superuser_flag());
        assert!(!metadata(json!(false)).superuser_flag());
        assert!(!metadata(json!("false")).superuser_flag());
        assert!(!metadata(json!("yes")).superuser_flag());
        assert!(!metadata(json!(1)).superuser_flag());
        assert!(!UserMetadata::default().superuser_flag());
    }

    #[test]
    fn provider_shaped_claims_decode() {
        let id = Uuid::new_v4();
        let claims: Claims = serde_json::from_value(json!({
            "sub": id,
            "email": "a@example.com",
            "user_metadata": { "is_superuser": "true", "display_name": "A" },
            "exp": 0,
            "iat": 0,
            "role": "authenticated"
        }))
        .unwrap();

        assert_eq!(claims.identity(), Identity { id, is_superuser: true });
    }

    #[test]
    fn missing_metadata_means_regular_user() {
        let id = Uuid::new_v4();
        let claims: Claims = serde_json::from_value(json!({ "sub": id, "exp": 0, "iat": 0 })).unwrap();
        assert_eq!(claims.identity(), Identity::user(id));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let id = Uuid::new_v4();
        let token = generate_jwt(&Claims::new(id, None, true, 1), SECRET).unwrap();
        let claims = validate_jwt(&token, SECRET, None).unwrap();
        assert_eq!(claims.identity(), Identity { id, is_superuser: true });
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let id = Uuid::new_v4();
        let token = generate_jwt(&Claims::new(id, None, false, 1), SECRET).unwrap();
        assert!(matches!(validate_jwt(&token, "other", None), Err(JwtError::InvalidToken(_))));

        let mut expired = Claims::new(id, None, false, 1);
        expired.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt(&expired, SECRET).unwrap();
        assert!(matches!(validate_jwt(&token, SECRET, None), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn refuses_empty_secret() {
        let claims = Claims::new(Uuid::new_v4(), None, false, 1);
        assert!(matches!(generate_jwt(&claims, ""), Err(JwtError::InvalidSecret)));
        assert!(matches!(validate_jwt("x.y.z", "", None), Err(JwtError::InvalidSecret)));
    }
}
