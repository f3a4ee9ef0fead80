//! The `Server-Authorization` response header: signed by the Receiver, verified by
//! the Sender to confirm the response actually came from the holder of the shared key.

use crate::credentials::Key;
use crate::error::Result;
use crate::header::Header;
use crate::mac::{Mac, MacType};
use crate::request::RequestState;

/// A response's Hawk-relevant fields, tied to the request that provoked it via a
/// [`RequestState`] (the request's `ts`/`nonce`, reused verbatim per §3).
///
/// Built with [`ResponseBuilder`]. Used both to mint a `Server-Authorization` header
/// (the Receiver side) and to check one (the Sender side).
#[derive(Debug, Clone)]
pub struct Response<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    path: &'a str,
    reqstate: &'a RequestState,
    hash: Option<Vec<u8>>,
    ext: Option<&'a str>,
}

impl<'a> Response<'a> {
    /// Sign this response, producing the `Header` a server would send as
    /// `Server-Authorization`.
    ///
    /// Only `mac`, `hash`, and `ext` are populated; `id`/`ts`/`nonce` are omitted
    /// from the response header since the Sender already knows them.
    pub fn make_header(&self, key: &Key) -> Result<Header> {
        let mac = Mac::new(
            MacType::Response,
            key,
            self.reqstate.ts,
            &self.reqstate.nonce,
            self.method,
            self.host,
            self.port,
            self.path,
            self.hash.as_deref(),
            self.ext,
            None,
            None,
        )?;

        Header::new(
            None,
            None,
            None,
            Some(mac),
            self.hash.clone(),
            self.ext.map(str::to_string),
            None,
            None,
        )
    }

    /// Check a `Server-Authorization` header against `key`.
    ///
    /// The MAC must match, and if a content hash was supplied locally (i.e. the
    /// caller computed one over the response body it received), the header must
    /// carry a matching hash too. A hash present in the header but not checked
    /// locally is ignored, matching how other Hawk implementations treat an
    /// unvalidated hash as a no-op rather than a failure.
    pub fn validate_header(&self, response_header: &Header, key: &Key) -> bool {
        let header_mac = match response_header.mac {
            Some(ref mac) => mac,
            None => return false,
        };

        let calculated = match Mac::new(
            MacType::Response,
            key,
            self.reqstate.ts,
            &self.reqstate.nonce,
            self.method,
            self.host,
            self.port,
            self.path,
            response_header.hash.as_deref(),
            response_header.ext.as_deref(),
            None,
            None,
        ) {
            Ok(mac) => mac,
            Err(_) => return false,
        };

        if !calculated.verify(header_mac) {
            return false;
        }

        if let Some(ref local_hash) = self.hash {
            match response_header.hash {
                Some(ref server_hash) if server_hash == local_hash => {}
                _ => return false,
            }
        }

        true
    }
}

/// Builder for [`Response`], in the same chained-setter style as [`RequestBuilder`].
///
/// [`RequestBuilder`]: crate::request::RequestBuilder
#[derive(Debug, Clone)]
pub struct ResponseBuilder<'a>(Response<'a>);

impl<'a> ResponseBuilder<'a> {
    /// Start a `Response` bound to the given request's timestamp and nonce.
    ///
    /// Normally reached through [`Request::make_response_builder`](crate::request::Request::make_response_builder).
    pub fn from_request_state(
        reqstate: &'a RequestState,
        method: &'a str,
        host: &'a str,
        port: u16,
        path: &'a str,
    ) -> Self {
        ResponseBuilder(Response {
            method,
            host,
            port,
            path,
            reqstate,
            hash: None,
            ext: None,
        })
    }

    /// Set the content hash for the response. Always computed from the actual
    /// response payload, never copied from an incoming header.
    pub fn hash<H: Into<Option<Vec<u8>>>>(mut self, hash: H) -> Self {
        self.0.hash = hash.into();
        self
    }

    /// Set the `ext` Hawk property for the response.
    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> Self {
        self.0.ext = ext.into();
        self
    }

    pub fn response(self) -> Response<'a> {
        self.0
    }
}
