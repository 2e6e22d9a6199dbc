use bcrypt::BcryptError;

pub use bcrypt::DEFAULT_COST;

/// Hash a plaintext password for storage. Each call uses a fresh salt.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// A wrong password is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plaintext, hash)
}

/// Spend one bcrypt round at `cost` on `plaintext` and report no match. Used
/// when there is no stored hash to check against.
pub fn decoy_verify(plaintext: &str, cost: u32) -> bool {
    if let Err(e) = bcrypt::hash(plaintext, cost) {
        tracing::warn!("Decoy hash failed: {}", e);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt minimum; keeps tests fast
    const COST: u32 = 4;

    #[test]
    fn hash_never_equals_plaintext() {
        let hash = hash_password("pw123", COST).unwrap();
        assert_ne!(hash, "pw123");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn verify_accepts_the_hashed_password() {
        let hash = hash_password("pw123", COST).unwrap();
        assert!(verify_password("pw123", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("pw123", COST).unwrap();
        assert!(!verify_password("pw124", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let h1 = hash_password("pw123", COST).unwrap();
        let h2 = hash_password("pw123", COST).unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("pw123", &h1).unwrap());
        assert!(verify_password("pw123", &h2).unwrap());
    }

    #[test]
    fn decoy_verify_never_matches() {
        assert!(!decoy_verify("pw123", COST));
        assert!(!decoy_verify("", COST));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("pw123", "not-a-hash").is_err());
    }
}
