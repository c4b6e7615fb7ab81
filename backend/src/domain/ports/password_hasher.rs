//! Opaque password hashing capability.
//!
//! The domain only ever sees `hash(secret) -> digest` and
//! `verify(secret, digest) -> bool`; the algorithm lives in an outbound
//! adapter.

use crate::domain::Error;

/// Digest and verify secrets. Hashing is CPU-bound and synchronous.
pub trait PasswordHasher: Send + Sync {
    /// Produce an opaque digest for a secret.
    fn hash(&self, secret: &str) -> Result<String, Error>;

    /// Check a secret against a stored digest. Undecodable digests verify
    /// as false rather than erroring, so a corrupt row cannot lock out the
    /// whole login path with 500s.
    fn verify(&self, secret: &str, digest: &str) -> bool;
}
