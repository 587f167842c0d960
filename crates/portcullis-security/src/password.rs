// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Salted password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! the cost parameters and salt travel with the hash and verification needs
//! nothing but the stored string.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use portcullis_config::model::PasswordConfig;
use portcullis_core::PortcullisError;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for PasswordParams {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_cost: config.memory_cost,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl PasswordParams {
    fn hasher(&self) -> Result<Argon2<'static>, PortcullisError> {
        let params = Params::new(self.memory_cost, self.iterations, self.parallelism, None)
            .map_err(|e| PortcullisError::Password(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash `password` with a fresh random salt, returning a PHC string.
pub fn hash_password(password: &str, params: &PasswordParams) -> Result<String, PortcullisError> {
    if password.is_empty() {
        return Err(PortcullisError::Password("password must not be empty".to_string()));
    }

    let salt = generate_salt()?;
    let hash = params
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PortcullisError::Password(format!("Argon2id hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A wrong password is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, PortcullisError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| PortcullisError::Password(format!("malformed password hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => {
            debug!("password verification failed");
            Ok(false)
        }
        Err(e) => Err(PortcullisError::Password(format!(
            "password verification failed: {e}"
        ))),
    }
}

/// `true` when a stored hash was produced with weaker or different settings
/// than `params` and should be replaced on the next successful login.
pub fn needs_rehash(phc: &str, params: &PasswordParams) -> Result<bool, PortcullisError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| PortcullisError::Password(format!("malformed password hash: {e}")))?;

    if parsed.algorithm != Algorithm::Argon2id.ident() {
        return Ok(true);
    }

    let stored = Params::try_from(&parsed)
        .map_err(|e| PortcullisError::Password(format!("unreadable hash parameters: {e}")))?;

    Ok(stored.m_cost() != params.memory_cost
        || stored.t_cost() != params.iterations
        || stored.p_cost() != params.parallelism)
}

fn generate_salt() -> Result<SaltString, PortcullisError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| PortcullisError::Password("failed to generate random salt".to_string()))?;
    SaltString::encode_b64(&salt)
        .map_err(|e| PortcullisError::Password(format!("salt encoding failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const FAST: PasswordParams = PasswordParams {
        memory_cost: 8192,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn hash_is_argon2id_phc_string() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=8192,t=1,p=1$"), "got: {hash}");
    }

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(!verify_password("battery staple", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("pw", &FAST).unwrap();
        let b = hash_password("pw", &FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(
            hash_password("", &FAST),
            Err(PortcullisError::Password(_))
        ));
    }

    #[test]
    fn malformed_hash_is_error() {
        assert!(matches!(
            verify_password("pw", "not-a-phc-string"),
            Err(PortcullisError::Password(_))
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = PasswordParams {
            memory_cost: 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(matches!(
            hash_password("pw", &params),
            Err(PortcullisError::Password(_))
        ));
    }

    #[test]
    fn rehash_when_params_change() {
        let hash = hash_password("pw", &FAST).unwrap();
        assert!(!needs_rehash(&hash, &FAST).unwrap());
        let stronger = PasswordParams {
            iterations: 2,
            ..FAST
        };
        assert!(needs_rehash(&hash, &stronger).unwrap());
    }

    #[test]
    fn params_from_config() {
        let params = PasswordParams::from(&PasswordConfig::default());
        assert_eq!(params, PasswordParams::default());
    }
}
