use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Algorithm tag stored next to each credential record.
pub const ALGORITHM: &str = "argon2id";

/// Argon2id cost parameters used when hashing new passwords.
///
/// Verification ignores these and uses the parameters encoded in the stored
/// PHC string, so changing them never invalidates existing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashing {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordHashing {
    /// Cheapest parameters argon2 accepts. Tests and benches only.
    pub fn minimal() -> Self {
        Self { memory_kib: Params::MIN_M_COST, iterations: 1, parallelism: 1 }
    }

    fn hasher(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash with a fresh random salt, returning a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Constant-time comparison against a stored PHC string.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// [`hash`](Self::hash) on the blocking pool, keeping argon2 off the
    /// async worker threads.
    pub async fn hash_async(&self, password: String) -> Result<String, AuthError> {
        let hashing = *self;
        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|e| AuthError::HashError(format!("spawn_blocking failed: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_async(&self, password: String, stored: String) -> Result<bool, AuthError> {
        let hashing = *self;
        tokio::task::spawn_blocking(move || hashing.verify(&password, &stored))
            .await
            .map_err(|e| AuthError::HashError(format!("spawn_blocking failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = PasswordHashing::minimal();
        let stored = h.hash("pw123").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(h.verify("pw123", &stored).unwrap());
        assert!(!h.verify("wrongpw", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let h = PasswordHashing::minimal();
        assert_ne!(h.hash("pw123").unwrap(), h.hash("pw123").unwrap());
    }

    #[test]
    fn verify_uses_parameters_from_the_stored_hash() {
        let stored = PasswordHashing::minimal().hash("pw123").unwrap();
        assert!(PasswordHashing::default().verify("pw123", &stored).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = PasswordHashing::minimal().verify("pw123", "not-a-phc").unwrap_err();
        assert!(err.is_internal());
    }

    #[tokio::test]
    async fn blocking_pool_variants_agree_with_inline_ones() {
        let h = PasswordHashing::minimal();
        let stored = h.hash_async("pw123".into()).await.unwrap();
        assert!(h.verify("pw123", &stored).unwrap());
        assert!(h.verify_async("pw123".into(), stored.clone()).await.unwrap());
        assert!(!h.verify_async("wrongpw".into(), stored).await.unwrap());
        assert!(h.verify_async("pw123".into(), "not-a-phc".into()).await.unwrap_err().is_internal());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let h = PasswordHashing { memory_kib: 1, iterations: 0, parallelism: 1 };
        assert!(matches!(h.hash("x"), Err(AuthError::HashError(_))));
    }
}
