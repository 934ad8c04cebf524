//! Password hashing utilities
//!
//! The default `sha512` scheme is an unsalted SHA-512 digest encoded as
//! standard base64. It is deterministic, so two accounts sharing a password
//! share a digest. `bcrypt` is available as a salted alternative. The
//! configured scheme only decides how new digests are made; verification
//! reads the scheme off the stored digest, so rows written before a switch
//! keep working.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bcrypt::DEFAULT_COST;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use thiserror::Error;
use tracing::warn;

/// Length of an encoded `sha512` digest (64 bytes in base64).
pub const SHA512_DIGEST_LEN: usize = 88;

/// Every bcrypt digest starts with `$2`; base64 never contains `$`.
const BCRYPT_PREFIX: &str = "$2";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Password digest scheme, selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Sha512,
    Bcrypt,
}

impl PasswordScheme {
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self {
            Self::Sha512 => Ok(hash_password(password)),
            Self::Bcrypt => Ok(bcrypt::hash(password, DEFAULT_COST)?),
        }
    }

    /// Scheme that produced a stored digest
    pub fn of_digest(digest: &str) -> Self {
        if digest.starts_with(BCRYPT_PREFIX) {
            Self::Bcrypt
        } else {
            Self::Sha512
        }
    }

    /// A digest of this scheme for logins whose email is unknown, so both
    /// failure paths cost one verification. Computed once per process.
    pub fn dummy_digest(&self) -> Result<&'static str, PasswordError> {
        static SHA512_DUMMY: OnceLock<String> = OnceLock::new();
        static BCRYPT_DUMMY: OnceLock<String> = OnceLock::new();

        match self {
            Self::Sha512 => Ok(SHA512_DUMMY.get_or_init(|| hash_password(""))),
            Self::Bcrypt => {
                if let Some(digest) = BCRYPT_DUMMY.get() {
                    return Ok(digest);
                }
                let digest = bcrypt::hash("", DEFAULT_COST)?;
                Ok(BCRYPT_DUMMY.get_or_init(|| digest))
            }
        }
    }
}

/// Hash a password with SHA-512, base64 encoded
pub fn hash_password(password: &str) -> String {
    STANDARD.encode(Sha512::digest(password.as_bytes()))
}

/// Check a password against a stored digest of either scheme.
///
/// A digest that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordScheme::of_digest(digest) {
        PasswordScheme::Sha512 => hash_password(password) == digest,
        PasswordScheme::Bcrypt => match bcrypt::verify(password, digest) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "stored bcrypt digest is unreadable");
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_matches_known_digest() {
        assert_eq!(
            hash_password(""),
            "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg/SpIdNs6c5H0NE8XYXysP+DGNKHfuwvY7kxvUdBeoGlODJ6+SfaPg=="
        );
        assert_eq!(
            hash_password("p@ss1"),
            "lEgl7aUO2atDyAmoZIs/7fXquXKbEE0Fvqkwigyg78yQiH7cMroTPLe6nkoce1KQpznEmTCKkj1lYd8FlQZicw=="
        );
    }

    #[test]
    fn sha512_is_deterministic_and_fixed_length() {
        let fixtures = ["p@ss1", "secret!", "another#one", "p@ss2"];
        let digests: Vec<String> = fixtures.iter().map(|p| hash_password(p)).collect();

        for (plain, digest) in fixtures.iter().zip(&digests) {
            assert_eq!(&hash_password(plain), digest);
            assert_ne!(*plain, digest.as_str());
            assert_eq!(digest.len(), SHA512_DIGEST_LEN);
        }

        for i in 0..digests.len() {
            for j in (i + 1)..digests.len() {
                assert_ne!(digests[i], digests[j]);
            }
        }
    }

    #[test]
    fn sha512_digest_verifies_by_equality() {
        let digest = PasswordScheme::Sha512.hash("p@ss1").unwrap();

        assert!(verify_password("p@ss1", &digest));
        assert!(!verify_password("p@ss2", &digest));
    }

    #[test]
    fn bcrypt_scheme_salts_digests() {
        let scheme = PasswordScheme::Bcrypt;
        let first = scheme.hash("p@ss1").unwrap();
        let second = scheme.hash("p@ss1").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("p@ss1", &first));
        assert!(verify_password("p@ss1", &second));
        assert!(!verify_password("wrong!", &first));
    }

    #[test]
    fn scheme_is_read_from_the_digest() {
        let bcrypt_digest = PasswordScheme::Bcrypt.hash("p@ss1").unwrap();

        assert_eq!(PasswordScheme::of_digest(&bcrypt_digest), PasswordScheme::Bcrypt);
        assert_eq!(PasswordScheme::of_digest(&hash_password("p@ss1")), PasswordScheme::Sha512);
        assert_eq!(PasswordScheme::of_digest(""), PasswordScheme::Sha512);
    }

    #[test]
    fn unreadable_bcrypt_digest_is_a_mismatch() {
        assert!(!verify_password("p@ss1", "$2b$12$truncated"));
        assert!(!verify_password("p@ss1", "$2"));
    }

    #[test]
    fn dummy_digest_matches_its_scheme() {
        for scheme in [PasswordScheme::Sha512, PasswordScheme::Bcrypt] {
            let dummy = scheme.dummy_digest().unwrap();
            assert_eq!(PasswordScheme::of_digest(dummy), scheme);
            // cached after the first call
            assert!(std::ptr::eq(dummy, scheme.dummy_digest().unwrap()));
            assert!(!verify_password("p@ss1", dummy));
        }
    }

    #[test]
    fn scheme_parses_from_lowercase_names() {
        #[derive(Deserialize)]
        struct Holder {
            scheme: PasswordScheme,
        }

        let parsed: Holder = toml::from_str("scheme = \"bcrypt\"").unwrap();
        assert_eq!(parsed.scheme, PasswordScheme::Bcrypt);
        assert_eq!(PasswordScheme::default(), PasswordScheme::Sha512);
    }
}
