use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("failed to verify password: {e}")))
    }

    pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
        if password.len() < 8 {
            return Err(AppError::Validation(
                "password must be at least 8 characters long".to_string(),
            ));
        }

        let has_letter = password.chars().any(|c| c.is_alphabetic());
        let has_digit = password.chars().any(|c| c.is_numeric());

        if !has_letter || !has_digit {
            return Err(AppError::Validation(
                "password must contain at least one letter and one number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_check_requires_length_and_mix() {
        assert!(PasswordService::validate_password_strength("short1").is_err());
        assert!(PasswordService::validate_password_strength("allletters").is_err());
        assert!(PasswordService::validate_password_strength("12345678").is_err());
        assert!(PasswordService::validate_password_strength("sturdy pass 1").is_ok());
    }

    #[test]
    fn hash_then_verify() {
        let hashed = PasswordService::hash_password("sturdy pass 1").unwrap();
        assert!(PasswordService::verify_password("sturdy pass 1", &hashed).unwrap());
        assert!(!PasswordService::verify_password("wrong pass 2", &hashed).unwrap());
    }
}
