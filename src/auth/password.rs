//! Password hashing
//! Mission: One-way salted hashes, constant-time verification

use bcrypt::{hash, verify, BcryptError};
use lazy_static::lazy_static;

/// Fixed bcrypt work factor for every stored hash
pub const BCRYPT_COST: u32 = 10;

lazy_static! {
    // Verified against when the account does not exist, so unknown emails
    // cost the same as wrong passwords.
    static ref DECOY_HASH: Option<String> = hash("decoy-password", BCRYPT_COST).ok();
}

/// Hash a plaintext password with a fresh salt
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, BCRYPT_COST)
}

/// Compare a plaintext password against a stored hash.
///
/// A stored value that is not a valid bcrypt hash never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

/// Compute the decoy hash now so the first unknown-email sign-in does not
/// pay for it.
pub fn warm_up() {
    lazy_static::initialize(&DECOY_HASH);
}

/// Spend one verification's worth of work and report a mismatch
pub fn verify_decoy(password: &str) -> bool {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_password(password, decoy);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hashed = hash_password("secret123").unwrap();

        assert_ne!(hashed, "secret123");
        assert!(!hashed.contains("secret123"));
        assert!(hashed.starts_with("$2b$10$"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret123").unwrap();
        let second = hash_password("secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_verification() {
        let hashed = hash_password("secret123").unwrap();

        assert!(verify_password("secret123", &hashed));
        assert!(!verify_password("wrongpassword", &hashed));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("secret123", "secret123"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_decoy_always_mismatches() {
        assert!(!verify_decoy("decoy-password"));
        assert!(!verify_decoy("anything"));
    }

    #[test]
    fn test_warm_up_builds_decoy_hash() {
        warm_up();

        let decoy = DECOY_HASH.as_deref().unwrap();
        assert!(decoy.starts_with("$2b$10$"));
        assert!(verify_password("decoy-password", decoy));
    }
}
