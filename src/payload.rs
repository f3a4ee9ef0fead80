//! Payload hashing: binds the entity body (and its content type) into the MAC.

use crate::crypto::{self, DigestAlgorithm};
use crate::error::Result;

/// Reduce a `Content-Type` header value to the bare media type Hawk hashes over:
/// lowercased, trimmed, with any `;`-delimited parameters (e.g. `; charset=utf8`)
/// stripped. This is what lets a client that sends `application/json; charset=utf8`
/// interoperate with a server that normalizes to `application/json; charset=other`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Incrementally hashes `"hawk.1.payload\n" + content_type + "\n" + body + "\n"`.
///
/// `content_type` should already be normalized (see [`normalize_content_type`]);
/// `PayloadHasher::hash` does this for you.
pub struct PayloadHasher {
    hasher: Box<dyn crypto::Hasher>,
}

impl PayloadHasher {
    /// Start a new hasher for `algorithm`, priming it with the `hawk.1.payload`
    /// preamble and the (already-normalized) content type.
    pub fn new(content_type: &str, algorithm: DigestAlgorithm) -> Result<Self> {
        let mut hasher = crypto::cryptographer().new_hasher(algorithm)?;
        hasher.update(b"hawk.1.payload\n")?;
        hasher.update(content_type.as_bytes())?;
        hasher.update(b"\n")?;
        Ok(PayloadHasher { hasher })
    }

    /// Hash a single complete payload and return the digest (not yet base64-encoded).
    ///
    /// `content_type` is normalized internally, so callers may pass the raw header
    /// value, parameters and all.
    pub fn hash(content_type: &str, algorithm: DigestAlgorithm, payload: &[u8]) -> Result<Vec<u8>> {
        let mut hasher = PayloadHasher::new(&normalize_content_type(content_type), algorithm)?;
        hasher.update(payload)?;
        hasher.finish()
    }

    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        self.hasher.update(data)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.hasher.update(b"\n")?;
        Ok(self.hasher.finish()?)
    }
}

/// Hash `content`/`content_type` for signing or verifying a message, gated by
/// `always_hash_content` (§6).
///
/// Supplying exactly one of `content`/`content_type` is always a caller error,
/// regardless of `always_hash_content`. Supplying neither is only acceptable
/// when hashing has been explicitly disabled; otherwise every signed or
/// verified message is expected to carry a payload hash (spec's content/
/// content_type value-error rule).
pub fn hash_if_enabled(
    content: Option<&[u8]>,
    content_type: Option<&str>,
    always_hash_content: bool,
    algorithm: DigestAlgorithm,
) -> crate::error::Result<Option<Vec<u8>>> {
    match (content, content_type) {
        (Some(_), None) | (None, Some(_)) => Err(crate::error::Error::Value(
            "content and content_type must be supplied together".to_string(),
        )),
        _ if !always_hash_content => Ok(None),
        (Some(content), Some(content_type)) => {
            Ok(Some(PayloadHasher::hash(content_type, algorithm, content)?))
        }
        (None, None) => Err(crate::error::Error::Value(
            "no content to hash; pass Options::payload or disable always_hash_content".to_string(),
        )),
    }
}
