use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{Role, UserRow};

use crate::auth::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub role: String,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: Role, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id.to_string(),
            email,
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: u64,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiration_hours: config.jwt_expiration_hours,
        }
    }

    pub fn create_token(&self, user: &UserRow) -> Result<String, AppError> {
        let claims = Claims::new(
            user.id,
            user.email.clone(),
            user.role,
            self.expiration_hours,
        );
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service() -> JwtService {
        JwtService::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            jwt_expiration_hours: 1,
        })
    }

    fn user(role: Role) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let service = service();
        let user = user(Role::Organizer);
        let token = service.create_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, "organizer");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service();
        let token = service.create_token(&user(Role::User)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.verify_token(&tampered).is_err());
    }
}
