use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::error::{AppError, AppResult};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// Constant-time comparison is done by argon2 itself.
pub fn verify_password(hash: &str, candidate: &str) -> AppResult<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::unauthorized("invalid credentials"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password(&hash, "s3cret").is_ok());
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let hash = hash_password("s3cret").unwrap();
        let err = verify_password(&hash, "guess").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
