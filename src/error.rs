//! The error type shared by every fallible operation in this crate.

use failure::Fail;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while signing or verifying a Hawk exchange.
///
/// Variants carry only the fields a caller legitimately needs. In particular,
/// `MacMismatch` never says *which* component of the normalized string differed —
/// doing so would hand an attacker an oracle for forging one field at a time.
#[derive(Debug, Fail)]
pub enum Error {
    /// A `Credentials` record is missing, or missing/empty `id`, `key`, or `algorithm`.
    #[fail(display = "invalid credentials")]
    InvalidCredentials,

    /// The host-supplied `credentials_map` callback failed or returned no credentials.
    #[fail(display = "credentials lookup failed: {}", _0)]
    CredentialsLookupError(String),

    /// A header attribute, on emission or parse, contained forbidden characters or
    /// the header as a whole was structurally malformed.
    #[fail(display = "bad header value: {}", _0)]
    BadHeaderValue(String),

    /// The payload hash did not match the body, or was required but absent.
    #[fail(display = "payload hash mismatch")]
    MisComputedContentHash,

    /// The MAC over the normalized string did not match. Deliberately uninformative.
    #[fail(display = "MAC mismatch")]
    MacMismatch,

    /// The timestamp fell outside the permitted skew window.
    #[fail(
        display = "token expired (stale timestamp); verifier's local time is {}",
        localtime_in_seconds
    )]
    TokenExpired { localtime_in_seconds: u64 },

    /// `seen_nonce` reported that this `(id, nonce, ts)` triple was already used.
    #[fail(display = "nonce already processed")]
    AlreadyProcessed,

    /// The caller supplied inconsistent inputs (e.g. `content` without `content_type`).
    #[fail(display = "invalid arguments: {}", _0)]
    Value(String),

    #[fail(display = "{}", _0)]
    Crypto(#[fail(cause)] crate::crypto::CryptoError),

    #[fail(display = "base64 decode error: {}", _0)]
    Base64(#[fail(cause)] base64::DecodeError),
}

impl From<crate::crypto::CryptoError> for Error {
    fn from(e: crate::crypto::CryptoError) -> Self {
        Error::Crypto(e)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Base64(e)
    }
}

/// Seconds since the Unix epoch, clamped to zero for a clock somehow set before
/// it. Used only to fill in [`Error::TokenExpired`]'s diagnostic field.
pub(crate) fn unix_seconds(t: std::time::SystemTime) -> u64 {
    t.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
