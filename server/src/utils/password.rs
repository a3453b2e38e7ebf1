use argon2::password_hash::{rand_core::OsRng, Error as HashError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// PHC-format argon2id hash with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(password.as_bytes(), &salt) {
        Ok(hash) => Ok(hash.to_string()),
        Err(err) => Err(anyhow::anyhow!("Password hashing failed: {}", err)),
    }
}

/// Checks a password against a stored PHC string. A mismatch is `Ok(false)`;
/// only an unparsable stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| anyhow::anyhow!("Stored password hash is not valid PHC: {}", err))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(err) => Err(anyhow::anyhow!("Password verification failed: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_accepts_only_the_original_password() {
        let hash = hash_password("lan-party-2024").expect("hash");
        assert!(verify_password("lan-party-2024", &hash).expect("verify"));
        assert!(!verify_password("lan-party-2025", &hash).expect("verify"));
    }

    #[test]
    fn salting_makes_repeat_hashes_differ() {
        let a = hash_password("same-input").expect("hash");
        let b = hash_password("same-input").expect("hash");
        assert_ne!(a, b);
        assert!(verify_password("same-input", &b).expect("verify"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
