//! The configuration surface shared by [`Sender`](crate::sender::Sender) and
//! [`Receiver`](crate::receiver::Receiver): everything in §6 beyond the bare
//! credentials and the request/response line itself.

use crate::nonce::SeenNonce;
use std::time::{Duration, SystemTime};

/// Default allowed clock skew between sender and receiver, matching the value
/// used throughout the Hawk ecosystem.
pub const DEFAULT_TIMESTAMP_SKEW: Duration = Duration::from_secs(60);

/// Options controlling how a [`Sender`](crate::sender::Sender) signs a request or
/// verifies a response, and how a [`Receiver`](crate::receiver::Receiver) verifies
/// a request or signs a response.
///
/// Not every field applies to both roles (`seen_nonce` and `accept_untrusted_content`
/// are receiver-only; `ext`/`app`/`dlg`/`content`/`content_type` apply to whichever
/// side is doing the signing) — unused fields are simply ignored by the other role,
/// the same way `mohawk`'s option dicts overlap between `Sender` and `Receiver`.
pub struct Options<'a> {
    pub(crate) timestamp_skew: Duration,
    pub(crate) localtime_offset: i64,
    pub(crate) ext: Option<&'a str>,
    pub(crate) app: Option<&'a str>,
    pub(crate) dlg: Option<&'a str>,
    pub(crate) content: Option<&'a [u8]>,
    pub(crate) content_type: Option<&'a str>,
    pub(crate) always_hash_content: bool,
    pub(crate) nonce: Option<&'a str>,
    pub(crate) timestamp: Option<SystemTime>,
    pub(crate) accept_untrusted_content: bool,
    pub(crate) seen_nonce: Option<&'a SeenNonce<'a>>,
}

impl<'a> Default for Options<'a> {
    fn default() -> Self {
        Options {
            timestamp_skew: DEFAULT_TIMESTAMP_SKEW,
            localtime_offset: 0,
            ext: None,
            app: None,
            dlg: None,
            content: None,
            content_type: None,
            always_hash_content: true,
            nonce: None,
            timestamp: None,
            accept_untrusted_content: false,
            seen_nonce: None,
        }
    }
}

impl<'a> Options<'a> {
    pub fn new() -> Self {
        Options::default()
    }

    /// How much clock skew between the two parties to tolerate, in either
    /// direction. Defaults to 60 seconds.
    pub fn timestamp_skew(mut self, skew: Duration) -> Self {
        self.timestamp_skew = skew;
        self
    }

    /// Adjust this side's notion of "now" by a fixed number of seconds, for a
    /// party known to run with a skewed clock rather than widening `timestamp_skew`
    /// for everyone.
    pub fn localtime_offset_in_seconds(mut self, offset: i64) -> Self {
        self.localtime_offset = offset;
        self
    }

    /// Application-specific data carried in the MAC but never interpreted by this
    /// crate (§4.1's `ext`).
    pub fn ext(mut self, ext: &'a str) -> Self {
        self.ext = Some(ext);
        self
    }

    /// The third-party application this credential is issued to, for delegated
    /// credentials (§4.1's `app`).
    pub fn app(mut self, app: &'a str) -> Self {
        self.app = Some(app);
        self
    }

    /// The application that granted the delegation, meaningful only alongside `app`.
    pub fn dlg(mut self, dlg: &'a str) -> Self {
        self.dlg = Some(dlg);
        self
    }

    /// The request or response body to hash into the MAC, along with its content
    /// type. Required together.
    pub fn payload(mut self, content: &'a [u8], content_type: &'a str) -> Self {
        self.content = Some(content);
        self.content_type = Some(content_type);
        self
    }

    /// Whether supplying [`Options::payload`] actually produces a `hash` attribute.
    /// Defaults to `true`; set `false` to sign or verify a request that carries a
    /// body without binding that body into the MAC, leaving integrity of the body
    /// to the transport layer instead.
    pub fn always_hash_content(mut self, always: bool) -> Self {
        self.always_hash_content = always;
        self
    }

    /// Force a specific nonce instead of generating one randomly. Intended for
    /// tests; production signing should leave this unset.
    pub fn nonce(mut self, nonce: &'a str) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Force a specific signing timestamp instead of the injected clock's `now`.
    /// Intended for tests; production signing should leave this unset.
    pub fn timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether a `Receiver` should accept a request that carries no payload hash
    /// even though it has a body, trusting the transport layer instead. Hawk
    /// normally requires a hash whenever a payload is present; this opts out.
    pub fn accept_untrusted_content(mut self, accept: bool) -> Self {
        self.accept_untrusted_content = accept;
        self
    }

    /// A callback consulted for every validated request to reject replays, per §5.
    pub fn seen_nonce(mut self, seen_nonce: &'a SeenNonce<'a>) -> Self {
        self.seen_nonce = Some(seen_nonce);
        self
    }
}
