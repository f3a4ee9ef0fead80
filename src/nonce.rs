//! Replay protection: every accepted `(nonce, id)` pair must be rejected if seen
//! again, for as long as its timestamp could still fall within the allowed skew.
//!
//! Hawk itself only defines the nonce as "a random string, unique to this request";
//! tracking which ones have already been seen is left to the application (§5). This
//! module provides the callback type a [`Receiver`](crate::receiver::Receiver) calls,
//! and a small in-memory cache for tests and examples — not meant for production use,
//! since it never expires entries and isn't shared across processes.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::SystemTime;

/// Called with `(nonce, ts)` for each incoming request; returns `true` if this
/// nonce has already been seen (and the request should be rejected as a replay).
pub type SeenNonce<'a> = dyn Fn(&str, SystemTime) -> bool + 'a;

/// A minimal in-memory nonce cache, useful for tests and single-process examples.
///
/// Entries are never evicted, so this grows without bound over a long-running
/// process; a real deployment should back `seen_nonce` with something that expires
/// entries once their timestamp falls outside the accepted skew window.
#[derive(Debug, Default)]
pub struct NonceCache {
    seen: Mutex<HashSet<String>>,
}

impl NonceCache {
    pub fn new() -> Self {
        NonceCache {
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// A `seen_nonce` callback backed by this cache: records `nonce` as seen and
    /// returns whether it had already been recorded before this call.
    pub fn seen_nonce(&self, nonce: &str, _ts: SystemTime) -> bool {
        let mut seen = self.seen.lock().expect("nonce cache lock poisoned");
        !seen.insert(nonce.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn first_use_is_not_a_replay() {
        let cache = NonceCache::new();
        assert!(!cache.seen_nonce("abc", UNIX_EPOCH));
    }

    #[test]
    fn second_use_is_a_replay() {
        let cache = NonceCache::new();
        assert!(!cache.seen_nonce("abc", UNIX_EPOCH));
        assert!(cache.seen_nonce("abc", UNIX_EPOCH));
    }

    #[test]
    fn distinct_nonces_are_independent() {
        let cache = NonceCache::new();
        assert!(!cache.seen_nonce("abc", UNIX_EPOCH));
        assert!(!cache.seen_nonce("xyz", UNIX_EPOCH));
    }
}
