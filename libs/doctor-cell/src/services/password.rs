use argon2::{Argon2, PasswordHasher};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use tracing::instrument;

#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    fn verifies(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).unwrap();
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    }

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("abcdefgh").unwrap();
        let second = hash_password("abcdefgh").unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("abcdefgh"));
        assert!(first.starts_with("$argon2id$"));
        assert!(verifies("abcdefgh", &first));
        assert!(!verifies("abcdefgi", &first));
    }
}
