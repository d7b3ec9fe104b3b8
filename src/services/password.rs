use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    config::PasswordMode,
    error::{AppError, AppResult},
};

/// Value to store for `password` under `mode`.
pub fn prepare(mode: PasswordMode, password: &str) -> AppResult<String> {
    match mode {
        PasswordMode::Plaintext => Ok(password.to_string()),
        PasswordMode::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
                .to_string();
            Ok(hash)
        }
    }
}

/// Whether `supplied` matches the `stored` value under `mode`.
pub fn matches(mode: PasswordMode, stored: &str, supplied: &str) -> bool {
    match mode {
        PasswordMode::Plaintext => stored == supplied,
        PasswordMode::Argon2 => match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(supplied.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                tracing::warn!("stored password is not an argon2 hash");
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_compares_verbatim() {
        let stored = prepare(PasswordMode::Plaintext, "Secret1").unwrap();
        assert_eq!(stored, "Secret1");
        assert!(matches(PasswordMode::Plaintext, &stored, "Secret1"));
        assert!(!matches(PasswordMode::Plaintext, &stored, "secret1"));
    }

    #[test]
    fn argon2_hashes_and_verifies() {
        let stored = prepare(PasswordMode::Argon2, "Secret1").unwrap();
        assert_ne!(stored, "Secret1");
        assert!(stored.starts_with("$argon2"));
        assert!(matches(PasswordMode::Argon2, &stored, "Secret1"));
        assert!(!matches(PasswordMode::Argon2, &stored, "wrong"));
        // A legacy plaintext row never verifies under argon2.
        assert!(!matches(PasswordMode::Argon2, "Secret1", "Secret1"));
    }
}
