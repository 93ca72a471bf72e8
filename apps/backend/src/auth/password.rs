//! Password hashing delegation.
//!
//! The rest of the crate treats credential verification as an opaque
//! capability; the hash format never leaks past this module.

use crate::error::AppError;

/// Hash a raw password for storage.
pub fn hash_password(raw: &str) -> Result<String, AppError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))
}

/// Verify a raw password against a stored hash.
/// A malformed stored hash verifies as false.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert_ne!(hash, "correct horse battery staple");
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse battery staple", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("sekrit").unwrap();
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
