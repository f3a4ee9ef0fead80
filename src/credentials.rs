//! Hawk credentials: an id, a key, and the digest algorithm they were issued under.

use crate::crypto::{self, DigestAlgorithm, HmacKey};
use crate::error::{Error, Result};

/// A key bound to one digest algorithm. Opaque: callers get it from `Key::new` and
/// pass it straight to `Mac::new`; there is no accessor for the raw bytes.
pub struct Key {
    pub(crate) algorithm: DigestAlgorithm,
    pub(crate) hmac_key: Box<dyn HmacKey>,
}

impl Key {
    /// Build a key for the given algorithm. Any byte sequence is accepted; Hawk does
    /// not impose a minimum key length (though very short keys make weak HMACs).
    pub fn new<B: AsRef<[u8]>>(key: B, algorithm: DigestAlgorithm) -> Result<Key> {
        let hmac_key = crypto::cryptographer().new_key(algorithm, key.as_ref())?;
        Ok(Key {
            algorithm,
            hmac_key,
        })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Key {{ algorithm: {:?}, .. }}", self.algorithm)
    }
}

/// A callback a `Receiver` uses to resolve the `id` advertised by an incoming
/// header into the `Credentials` it was signed with.
///
/// Looking credentials up is host-specific (a database, a config file, a fixed
/// map) and therefore lives outside this crate; errors raised by the callback
/// surface as [`crate::error::Error::CredentialsLookupError`] without leaking
/// their concrete type.
pub type CredentialsLookup<'a> = dyn Fn(&str) -> std::result::Result<Credentials, failure::Error> + 'a;

/// A Hawk credentials record: the shared secret and metadata needed to sign or
/// verify one side of an exchange.
///
/// `id` is the identifier a `Receiver` uses to look the credentials back up; it is
/// transmitted in the clear in every header.
pub struct Credentials {
    pub id: String,
    pub key: Key,
}

impl Credentials {
    /// Construct credentials directly from a raw key and algorithm name.
    ///
    /// This is a convenience over building a `Key` yourself; `algorithm` is matched
    /// case-insensitively and an unrecognized name is an `InvalidCredentials` error,
    /// same as an empty `id` or `key`.
    pub fn new<S, B>(id: S, key: B, algorithm: &str) -> Result<Credentials>
    where
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        let id = id.into();
        let algorithm = DigestAlgorithm::from_name(algorithm).ok_or(Error::InvalidCredentials)?;
        validate_non_empty(&id)?;
        validate_non_empty(key.as_ref())?;
        Ok(Credentials {
            id,
            key: Key::new(key, algorithm)?,
        })
    }
}

fn validate_non_empty<T: AsRef<[u8]>>(v: T) -> Result<()> {
    if v.as_ref().is_empty() {
        Err(Error::InvalidCredentials)
    } else {
        Ok(())
    }
}

/// Structural validation for a `Credentials` record obtained from an external
/// source (e.g. a `credentials_map` lookup), distinguishing "the record itself
/// is malformed" ([`Error::InvalidCredentials`]) from "the lookup callback
/// failed" ([`Error::CredentialsLookupError`], raised by the caller instead).
///
/// A key's algorithm and byte content are already validated and made opaque by
/// `Key::new` at construction time, so the only structural property left to
/// check on an already-built record is a non-empty `id`.
pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    validate_non_empty(&credentials.id)
}
