use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2 memory cost in KiB; the fixed work factor of every stored hash.
pub const HASH_MEMORY_KIB: u32 = 19 * 1024;
/// Argon2 iteration count.
pub const HASH_ITERATIONS: u32 = 2;

fn hasher() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, 1, None)
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    // Parameters come from the PHC string, so older hashes still verify.
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hash off the async executor.
pub async fn hash(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

/// Verify off the async executor.
pub async fn verify(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn hashes_are_salted_and_carry_their_parameters() {
        let a = hash_password("same").expect("hash a");
        let b = hash_password("same").expect("hash b");
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(a.contains(&format!("m={HASH_MEMORY_KIB},t={HASH_ITERATIONS}")));
    }

    #[tokio::test]
    async fn async_wrappers_roundtrip() {
        let hashed = hash("hunter22".to_string()).await.expect("hash");
        assert!(verify("hunter22".to_string(), hashed.clone()).await.expect("verify"));
        assert!(!verify("hunter23".to_string(), hashed).await.expect("verify"));
    }
}
