use crate::error::Result;

/// Hashes a password with bcrypt at the default cost factor.
pub fn hash_password(password: &str) -> Result<String> {
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    Ok(hash)
}

/// Verifies a password against a stored bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse").expect("hash should succeed");
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).expect("verify should succeed"));
        assert!(!verify_password("battery staple", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
