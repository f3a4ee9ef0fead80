//! Pluggable cryptography.
//!
//! Hawk needs three primitives: a source of random bytes, an HMAC keyed on the
//! credential's digest algorithm, and a plain digest (for payload hashing). Rather
//! than hard-wiring one crypto crate, callers can swap implementations by enabling
//! the `use_ring` (default) or `use_openssl` feature, or by calling
//! [`set_cryptographer`] themselves before any signing/verifying happens.

use failure::Fail;
use std::fmt;

pub mod holder;
#[cfg(feature = "use_openssl")]
mod openssl;
#[cfg(feature = "use_ring")]
mod ring;

pub use holder::{set_boxed_cryptographer, set_cryptographer, SetCryptographerError};

/// The digest algorithms a `Credentials` record may name.
///
/// Hawk allows any SHA-2 family member; `Sha256` is the common case and the only one
/// required by the wire format, but `Sha384`/`Sha512` are accepted when a peer names
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Parse an algorithm name, matching case-insensitively (`"sha256"`, `"SHA256"`, ...).
    pub fn from_name(name: &str) -> Option<DigestAlgorithm> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" => Some(DigestAlgorithm::Sha256),
            "sha384" => Some(DigestAlgorithm::Sha384),
            "sha512" => Some(DigestAlgorithm::Sha512),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An error from the underlying crypto backend. Kept deliberately opaque: callers
/// should not need to match on the inner cause, only whether an operation failed.
#[derive(Debug, Fail)]
pub enum CryptoError {
    #[fail(display = "unsupported digest algorithm: {}", _0)]
    UnsupportedDigest(DigestAlgorithm),
    #[fail(display = "{}", _0)]
    Other(failure::Error),
}

/// An HMAC key bound to one digest algorithm.
pub trait HmacKey: Send + Sync {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// An incremental digest. `finish` consumes the hasher since most backends do.
pub trait Hasher {
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;
    fn finish(&mut self) -> Result<Vec<u8>, CryptoError>;
}

/// The capability this crate needs from a crypto backend.
pub trait Cryptographer: Send + Sync {
    fn rand_bytes(&self, output: &mut [u8]) -> Result<(), CryptoError>;
    fn new_key(&self, algorithm: DigestAlgorithm, key: &[u8]) -> Result<Box<dyn HmacKey>, CryptoError>;
    fn constant_time_compare(&self, a: &[u8], b: &[u8]) -> bool;
    fn new_hasher(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Hasher>, CryptoError>;
}

pub(crate) fn cryptographer() -> &'static dyn Cryptographer {
    holder::get_cryptographer()
}
