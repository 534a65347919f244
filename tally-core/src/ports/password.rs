//! Password hashing port
//!
//! Defines how user credentials are turned into stored hashes and checked
//! again at login. The use cases never see the hashing algorithm.

use crate::domain::result::Result;

/// Password hashing trait
///
/// Implementations must produce self-describing hashes (salt and
/// parameters embedded) so `verify` needs nothing but the stored string.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain password for storage
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a plain password against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed
    /// hashes or hasher failures.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
