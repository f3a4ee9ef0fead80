//! The client side of a Hawk exchange: sign an outgoing request, then check the
//! server's response is genuinely bound to it.
//!
//! Modeled on `mohawk.Sender`: construction signs immediately (there is no
//! unsigned state to observe), and the resulting `Sender` is then used exactly
//! once to validate the matching response.

use crate::b64;
use crate::clock::Clock;
use crate::credentials::Credentials;
use crate::crypto;
use crate::error::{self, Error, Result};
use crate::options::Options;
use crate::payload::{hash_if_enabled, PayloadHasher};
use crate::request::{self, Request, RequestBuilder, RequestState};
use crate::response::ResponseBuilder;
use std::time::Duration;

/// A signed outgoing request, holding everything needed to later validate the
/// matching response.
pub struct Sender<'a> {
    credentials: &'a Credentials,
    header: String,
    reqstate: RequestState,
    method: String,
    host: String,
    port: u16,
    path: String,
}

impl<'a> Sender<'a> {
    /// Sign a request to `scheme://host:port path`, returning a `Sender` already
    /// holding the `Authorization` header value ([`Sender::header`]).
    ///
    /// `port` defaults from `scheme` when omitted (§4.1: 80 for `http`, 443 for
    /// `https`); an unrecognized scheme without an explicit port is an error.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credentials: &'a Credentials,
        clock: &dyn Clock,
        method: &str,
        scheme: &str,
        host: &str,
        port: Option<u16>,
        path: &str,
        options: Options<'_>,
    ) -> Result<Sender<'a>> {
        let port = request::resolve_port(scheme, port)?;
        let ts = options.timestamp.unwrap_or_else(|| offset_now(clock, options.localtime_offset));

        let nonce = match options.nonce {
            Some(n) => n.to_string(),
            None => random_nonce()?,
        };

        let hash = hash_if_enabled(
            options.content,
            options.content_type,
            options.always_hash_content,
            credentials.key.algorithm(),
        )?;

        let request = RequestBuilder::new(method, host, port, path)
            .hash(hash)
            .ext(options.ext)
            .app(options.app)
            .dlg(options.dlg)
            .request();

        let header = request
            .make_header(&credentials.id, &credentials.key, ts, &nonce)?
            .to_header_string();

        log::debug!(
            "hawk sender signed {} {} (id={})",
            method,
            path,
            credentials.id
        );

        Ok(Sender {
            credentials,
            header,
            reqstate: RequestState { ts, nonce },
            method: method.to_string(),
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// The `Authorization` header value to send with the request, including the
    /// leading `Hawk ` scheme token.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Check a `Server-Authorization` header against the response actually
    /// received, binding it to the request this `Sender` signed.
    ///
    /// `content`/`content_type` should be supplied whenever the response has a
    /// body; omitting them when the server did hash its body is itself an error,
    /// since an unchecked hash would let a tampered body through unnoticed.
    ///
    /// Applies the Clock gate against the original request's timestamp the same
    /// way [`Receiver::new`](crate::receiver::Receiver::new) does: a response
    /// captured and replayed back to this sender long after signing is rejected
    /// with [`Error::TokenExpired`] even though its MAC is genuine. `options`
    /// supplies the skew tolerance and localtime offset for that check; its
    /// other fields (content, nonce, ...) are ignored here.
    pub fn validate_response(
        &self,
        clock: &dyn Clock,
        server_authorization: &str,
        content: Option<&[u8]>,
        content_type: Option<&str>,
        options: Options<'_>,
    ) -> Result<()> {
        let header = crate::header::parse_header(server_authorization)?;

        let local_hash = match (content, content_type) {
            (Some(content), Some(content_type)) => Some(PayloadHasher::hash(
                content_type,
                self.credentials.key.algorithm(),
                content,
            )?),
            _ => None,
        };

        let response =
            ResponseBuilder::from_request_state(&self.reqstate, &self.method, &self.host, self.port, &self.path)
                .hash(local_hash)
                .response();

        if !response.validate_header(&header, &self.credentials.key) {
            log::warn!("hawk sender rejected response for id={}", self.credentials.id);
            return Err(Error::MacMismatch);
        }

        let now = offset_now(clock, options.localtime_offset);
        if !Request::is_fresh(self.reqstate.ts, now, options.timestamp_skew) {
            log::warn!("hawk sender rejected response for id={}: stale timestamp", self.credentials.id);
            return Err(Error::TokenExpired {
                localtime_in_seconds: error::unix_seconds(now),
            });
        }

        log::debug!("hawk sender verified response for id={}", self.credentials.id);
        Ok(())
    }
}

fn offset_now(clock: &dyn Clock, offset_seconds: i64) -> std::time::SystemTime {
    let now = clock.now();
    if offset_seconds >= 0 {
        now + Duration::from_secs(offset_seconds as u64)
    } else {
        now - Duration::from_secs((-offset_seconds) as u64)
    }
}

fn random_nonce() -> Result<String> {
    let mut buf = [0u8; 8];
    crypto::cryptographer().rand_bytes(&mut buf)?;
    Ok(b64::encode(buf))
}
