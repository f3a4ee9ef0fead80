//! A single HTTP request's Hawk-relevant artifacts: method, host, port, path+query,
//! and the optional `hash`/`ext`/`app`/`dlg` fields that ride along in the MAC.

use crate::credentials::Key;
use crate::header::Header;
use crate::mac::{Mac, MacType};
use crate::response::ResponseBuilder;
use std::time::{Duration, SystemTime};

/// The timestamp and nonce a Sender used to sign a request — the two values a
/// Response must reuse verbatim to bind it to that request (§3, §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub ts: SystemTime,
    pub nonce: String,
}

/// A request's Hawk-relevant fields, independent of any particular credentials.
///
/// Built with [`RequestBuilder`]. Used both to mint a header (`make_header`, the
/// Sender side) and to check one (`validate_header`, the Receiver side).
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    path: &'a str,
    hash: Option<Vec<u8>>,
    ext: Option<&'a str>,
    app: Option<&'a str>,
    dlg: Option<&'a str>,
}

/// The default port implied by a URL scheme (§4.1): `http` defaults to 80,
/// `https` to 443. Any other scheme has no well-known default.
pub fn default_port_for_scheme(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Resolve an explicit `port`, or fall back to the default for `scheme`.
///
/// Changing the scheme without supplying an explicit port therefore changes
/// the port bound into the MAC, so scheme tampering surfaces the same way
/// port tampering does: `Error::MacMismatch` (§5).
pub fn resolve_port(scheme: &str, port: Option<u16>) -> crate::error::Result<u16> {
    match port {
        Some(port) => Ok(port),
        None => default_port_for_scheme(scheme).ok_or_else(|| {
            crate::error::Error::Value(format!(
                "no default port for scheme {:?}; supply one explicitly",
                scheme
            ))
        }),
    }
}

impl<'a> Request<'a> {
    /// Sign this request, producing the `Header` a client would send as
    /// `Authorization`. `id` is the credentials identifier the receiver will use
    /// to look the signing key back up.
    pub fn make_header(
        &self,
        id: &str,
        key: &Key,
        ts: SystemTime,
        nonce: &str,
    ) -> crate::error::Result<Header> {
        let mac = Mac::new(
            MacType::Header,
            key,
            ts,
            nonce,
            self.method,
            self.host,
            self.port,
            self.path,
            self.hash.as_deref(),
            self.ext,
            self.app,
            self.dlg,
        )?;

        Header::new(
            Some(id.to_string()),
            Some(ts),
            Some(nonce.to_string()),
            Some(mac),
            self.hash.clone(),
            self.ext.map(str::to_string),
            self.app.map(str::to_string),
            self.dlg.map(str::to_string),
        )
    }

    /// Check that `header` (parsed from an incoming `Authorization` value) carries
    /// a MAC that matches `key` and this request line.
    ///
    /// Deliberately checked separately from [`Request::is_fresh`] so a caller can
    /// report a mismatched MAC and a stale-but-genuine timestamp as distinct
    /// errors (§5: the MAC gate runs strictly before the clock gate, so a forged
    /// request can never probe the clock check).
    pub fn verify_mac(&self, header: &Header, key: &Key) -> bool {
        let (ts, nonce, header_mac) = match (header.ts, &header.nonce, &header.mac) {
            (Some(ts), Some(nonce), Some(mac)) => (ts, nonce, mac),
            _ => return false,
        };

        let calculated = match Mac::new(
            MacType::Header,
            key,
            ts,
            nonce,
            self.method,
            self.host,
            self.port,
            self.path,
            header.hash.as_deref(),
            header.ext.as_deref(),
            header.app.as_deref(),
            header.dlg.as_deref(),
        ) {
            Ok(mac) => mac,
            Err(_) => return false,
        };

        calculated.verify(header_mac)
    }

    /// Whether `ts` is within `skew` of `now`, in either direction.
    pub fn is_fresh(ts: SystemTime, now: SystemTime, skew: Duration) -> bool {
        let delta = now
            .duration_since(ts)
            .unwrap_or_else(|e| e.duration())
            .max(ts.duration_since(now).unwrap_or_default());
        delta <= skew
    }

    /// Check `header` against `key`, accepting it iff the MAC matches and the
    /// timestamp is within `skew` of `now`. A convenience combining
    /// [`Request::verify_mac`] and [`Request::is_fresh`] for callers that don't
    /// need to distinguish the two failure modes.
    pub fn validate_header(&self, header: &Header, key: &Key, now: SystemTime, skew: Duration) -> bool {
        self.verify_mac(header, key)
            && header.ts.map_or(false, |ts| Request::is_fresh(ts, now, skew))
    }

    /// Build a [`ResponseBuilder`] for the response to this request, reusing its
    /// timestamp and nonce (the binding the Sender relies on).
    pub fn make_response_builder<'b>(&'b self, reqstate: &'b RequestState) -> ResponseBuilder<'b> {
        ResponseBuilder::from_request_state(reqstate, self.method, self.host, self.port, self.path)
    }

    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }
}

/// Builder for [`Request`], in the same chained-setter style as [`ResponseBuilder`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a>(Request<'a>);

impl<'a> RequestBuilder<'a> {
    pub fn new(method: &'a str, host: &'a str, port: u16, path: &'a str) -> Self {
        RequestBuilder(Request {
            method,
            host,
            port,
            path,
            hash: None,
            ext: None,
            app: None,
            dlg: None,
        })
    }

    pub fn hash<H: Into<Option<Vec<u8>>>>(mut self, hash: H) -> Self {
        self.0.hash = hash.into();
        self
    }

    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> Self {
        self.0.ext = ext.into();
        self
    }

    pub fn app<S: Into<Option<&'a str>>>(mut self, app: S) -> Self {
        self.0.app = app.into();
        self
    }

    pub fn dlg<S: Into<Option<&'a str>>>(mut self, dlg: S) -> Self {
        self.0.dlg = dlg.into();
        self
    }

    pub fn request(self) -> Request<'a> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::DigestAlgorithm;
    use std::time::UNIX_EPOCH;

    fn key() -> Key {
        Key::new(b"some secret", DigestAlgorithm::Sha256).unwrap()
    }

    #[test]
    fn make_and_validate_round_trip() {
        let key = key();
        let req = RequestBuilder::new("GET", "site.com", 80, "/foo?bar=1").request();
        let ts = UNIX_EPOCH + Duration::new(1_600_000_000, 0);
        let header = req.make_header("client-id", &key, ts, "abcdef").unwrap();

        assert!(req.validate_header(&header, &key, ts, Duration::from_secs(60)));
    }

    #[test]
    fn resolve_port_defaults_by_scheme() {
        assert_eq!(resolve_port("http", None).unwrap(), 80);
        assert_eq!(resolve_port("https", None).unwrap(), 443);
        assert_eq!(resolve_port("HTTPS", None).unwrap(), 443);
        assert_eq!(resolve_port("http", Some(8000)).unwrap(), 8000);
        assert!(resolve_port("ftp", None).is_err());
    }

    #[test]
    fn tampered_path_fails() {
        let key = key();
        let req = RequestBuilder::new("GET", "site.com", 80, "/foo?bar=1").request();
        let ts = UNIX_EPOCH + Duration::new(1_600_000_000, 0);
        let header = req.make_header("client-id", &key, ts, "abcdef").unwrap();

        let tampered = RequestBuilder::new("GET", "site.com", 80, "/TAMPERED?bar=1").request();
        assert!(!tampered.validate_header(&header, &key, ts, Duration::from_secs(60)));
    }
}
