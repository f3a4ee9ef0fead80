//! The server side of a Hawk exchange: verify an incoming request, then sign the
//! response so the sender can confirm it.
//!
//! Modeled on `mohawk.Receiver`: construction itself performs verification (MAC,
//! clock skew, payload hash, replay), so an `Ok(Receiver)` is, by construction, a
//! request that passed every check. There is no unverified state to observe.

use crate::clock::Clock;
use crate::credentials::{self, Credentials, CredentialsLookup};
use crate::error::{self, Error, Result};
use crate::header::{self, Header};
use crate::options::Options;
use crate::payload::{hash_if_enabled, PayloadHasher};
use crate::request::{self, Request, RequestBuilder, RequestState};
use crate::response::ResponseBuilder;
use std::time::Duration;

/// A verified incoming request, ready to have its response signed.
pub struct Receiver {
    credentials: Credentials,
    reqstate: RequestState,
    method: String,
    host: String,
    port: u16,
    path: String,
    header: Header,
}

impl Receiver {
    /// Verify `request_header` (an `Authorization` header value) against the
    /// credentials `credentials_map` resolves the header's `id` to, the request
    /// line it was attached to, and `options`.
    ///
    /// `port` defaults from `scheme` when omitted (§4.1: 80 for `http`, 443 for
    /// `https`); a request signed under a different scheme/port fails the MAC
    /// check below, it does not raise a separate error here.
    ///
    /// Every check — credentials lookup, payload hash, MAC, clock skew, replay —
    /// happens here; this returns `Err` at the first one that fails.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credentials_map: &CredentialsLookup<'_>,
        clock: &dyn Clock,
        method: &str,
        scheme: &str,
        host: &str,
        port: Option<u16>,
        path: &str,
        request_header: &str,
        options: Options<'_>,
    ) -> Result<Receiver> {
        let port = request::resolve_port(scheme, port)?;
        let header = header::parse_header(request_header)?;

        let header_id = header
            .id
            .as_deref()
            .ok_or_else(|| Error::BadHeaderValue("request header is missing id".to_string()))?;
        let credentials = credentials_map(header_id)
            .map_err(|e| Error::CredentialsLookupError(e.to_string()))?;
        credentials::validate_credentials(&credentials)?;

        let (ts, nonce) = match (header.ts, &header.nonce) {
            (Some(ts), Some(nonce)) => (ts, nonce.clone()),
            _ => {
                return Err(Error::BadHeaderValue(
                    "request header is missing ts or nonce".to_string(),
                ))
            }
        };

        verify_payload_hash(&header, &credentials, &options)?;

        let request = RequestBuilder::new(method, host, port, path)
            .hash(header.hash.clone())
            .ext(header.ext.as_deref())
            .app(header.app.as_deref())
            .dlg(header.dlg.as_deref())
            .request();

        if !request.verify_mac(&header, &credentials.key) {
            log::warn!(
                "hawk receiver rejected request {} {} (id={}): MAC mismatch",
                method,
                path,
                credentials.id
            );
            return Err(Error::MacMismatch);
        }

        let now = offset_now(clock, options.localtime_offset);
        if !Request::is_fresh(ts, now, options.timestamp_skew) {
            log::warn!(
                "hawk receiver rejected request {} {} (id={}): stale timestamp",
                method,
                path,
                credentials.id
            );
            return Err(Error::TokenExpired {
                localtime_in_seconds: error::unix_seconds(now),
            });
        }

        if let Some(seen_nonce) = options.seen_nonce {
            if seen_nonce(&nonce, ts) {
                log::warn!("hawk receiver rejected replayed nonce for id={}", credentials.id);
                return Err(Error::AlreadyProcessed);
            }
        }

        log::debug!(
            "hawk receiver accepted request {} {} (id={})",
            method,
            path,
            credentials.id
        );

        Ok(Receiver {
            credentials,
            reqstate: RequestState { ts, nonce },
            method: method.to_string(),
            host: host.to_string(),
            port,
            path: path.to_string(),
            header,
        })
    }

    /// The `ext` value the sender attached to the request, if any.
    pub fn ext(&self) -> Option<&str> {
        self.header.ext.as_deref()
    }

    /// The `app` value for a delegated-credential request, if any.
    pub fn app(&self) -> Option<&str> {
        self.header.app.as_deref()
    }

    /// The `dlg` value for a delegated-credential request, if any.
    pub fn dlg(&self) -> Option<&str> {
        self.header.dlg.as_deref()
    }

    /// Sign the response, producing a `Server-Authorization` header value.
    pub fn respond(&self, options: Options<'_>) -> Result<String> {
        let hash = hash_if_enabled(
            options.content,
            options.content_type,
            options.always_hash_content,
            self.credentials.key.algorithm(),
        )?;

        let response =
            ResponseBuilder::from_request_state(&self.reqstate, &self.method, &self.host, self.port, &self.path)
                .hash(hash)
                .ext(options.ext)
                .response();

        Ok(response.make_header(&self.credentials.key)?.to_header_string())
    }
}

fn verify_payload_hash(header: &Header, credentials: &Credentials, options: &Options<'_>) -> Result<()> {
    if !options.always_hash_content {
        return Ok(());
    }

    let (content, content_type) = match (options.content, options.content_type) {
        (Some(content), Some(content_type)) => (content, content_type),
        (None, None) => {
            return Err(Error::Value(
                "no content supplied to hash; pass Options::payload or disable always_hash_content".to_string(),
            ))
        }
        _ => return Err(Error::Value("content supplied without content_type".to_string())),
    };

    match &header.hash {
        None => {
            if options.accept_untrusted_content {
                Ok(())
            } else {
                Err(Error::MisComputedContentHash)
            }
        }
        Some(header_hash) => {
            let expected = PayloadHasher::hash(content_type, credentials.key.algorithm(), content)?;
            if &expected == header_hash {
                Ok(())
            } else {
                Err(Error::MisComputedContentHash)
            }
        }
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
