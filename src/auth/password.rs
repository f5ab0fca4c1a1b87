/// Password hashing and verification
///
/// bcrypt with the default cost factor. Hashing accepts any input; policy
/// about what makes an acceptable password belongs to the boundary layer,
/// not here. Neither function logs its arguments at any level.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, AuthError};

/// Hash a password using bcrypt.
///
/// # Errors
/// Returns `HashingFailure` only if the underlying bcrypt operation fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Auth(AuthError::HashingFailure(e.to_string())))
}

/// Verify a password against its stored hash.
///
/// Any difference yields `PasswordMismatch`, including a malformed stored
/// hash; the caller learns nothing beyond "does not match".
pub fn verify_password(password: &str, hashed: &str) -> Result<(), AppError> {
    match verify(password, hashed) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(AppError::Auth(AuthError::PasswordMismatch)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_succeeds() {
        let password = "correct horse battery staple";
        let hashed = hash_password(password).expect("failed to hash password");

        assert_ne!(password, hashed);
        assert!(hashed.starts_with("$2"));
        assert!(verify_password(password, &hashed).is_ok());
    }

    #[test]
    fn wrong_password_is_a_mismatch() {
        let hashed = hash_password("correct horse battery staple").unwrap();

        match verify_password("correct horse battery staplex", &hashed) {
            Err(AppError::Auth(AuthError::PasswordMismatch)) => {}
            other => panic!("expected PasswordMismatch, got {:?}", other),
        }
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch_not_a_crash() {
        match verify_password("anything", "not-a-bcrypt-hash") {
            Err(AppError::Auth(AuthError::PasswordMismatch)) => {}
            other => panic!("expected PasswordMismatch, got {:?}", other),
        }
    }

    #[test]
    fn empty_password_still_hashes_and_verifies() {
        let hashed = hash_password("").unwrap();
        assert!(verify_password("", &hashed).is_ok());
        assert!(verify_password("x", &hashed).is_err());
    }
}
