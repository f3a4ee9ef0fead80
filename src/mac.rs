//! The normalized string and the MAC computed over it.

use crate::b64;
use crate::credentials::Key;
use crate::crypto;
use crate::error::Result;
use std::fmt;
use std::io::Write;
use std::time::SystemTime;

/// Which of the two normalized-string forms to build: the request form (signed by
/// the Sender, verified by the Receiver) or the response form (signed by the
/// Receiver, verified by the Sender).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacType {
    Header,
    Response,
}

impl MacType {
    fn prefix(self) -> &'static str {
        match self {
            MacType::Header => "hawk.1.header",
            MacType::Response => "hawk.1.response",
        }
    }
}

/// A message authentication code: the signature in a Hawk transaction.
///
/// Equality is NOT constant-time; use [`Mac::verify`] to compare a computed MAC
/// against one parsed from a header.
#[derive(Clone, PartialEq, Eq)]
pub struct Mac(Vec<u8>);

impl Mac {
    /// Build the normalized string for `mac_type` and HMAC it with `key`.
    ///
    /// `app`/`dlg` must be passed together: `app.is_none() && dlg.is_some()` is a
    /// logic error in callers (the Sender/Receiver layer never does this), but to
    /// keep this a pure function we simply emit the lines as given and rely on the
    /// higher layer to enforce the "dlg implies app" rule.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mac_type: MacType,
        key: &Key,
        ts: SystemTime,
        nonce: &str,
        method: &str,
        host: &str,
        port: u16,
        resource: &str,
        hash: Option<&[u8]>,
        ext: Option<&str>,
        app: Option<&str>,
        dlg: Option<&str>,
    ) -> Result<Mac> {
        let normalized = normalized_string(mac_type, ts, nonce, method, host, port, resource, hash, ext, app, dlg);
        let sig = key.hmac_key.sign(&normalized)?;
        Ok(Mac(sig))
    }

    /// Constant-time comparison against another MAC, e.g. one parsed from a header.
    pub fn verify(&self, other: &Mac) -> bool {
        crypto::cryptographer().constant_time_compare(&self.0, &other.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn to_base64(&self) -> String {
        b64::encode(&self.0)
    }

    pub(crate) fn from_base64(s: &str) -> Result<Mac> {
        Ok(Mac(b64::decode(s)?))
    }
}

impl From<Vec<u8>> for Mac {
    fn from(bytes: Vec<u8>) -> Self {
        Mac(bytes)
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mac({})", self.to_base64())
    }
}

/// Build the exact bytes the MAC is computed over (§3/§4.1 of the normalized-string
/// grammar): one newline-terminated line per field, in a fixed order, with `app`/
/// `dlg` lines present only when `app` is `Some`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn normalized_string(
    mac_type: MacType,
    ts: SystemTime,
    nonce: &str,
    method: &str,
    host: &str,
    port: u16,
    resource: &str,
    hash: Option<&[u8]>,
    ext: Option<&str>,
    app: Option<&str>,
    dlg: Option<&str>,
) -> Vec<u8> {
    let ts_secs = ts
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let mut buf: Vec<u8> = Vec::new();
    // Writes to a Vec<u8> never fail; unwrap is just noise-avoidance, not error
    // handling (there is no error to propagate).
    write!(buf, "{}\n", mac_type.prefix()).unwrap();
    write!(buf, "{}\n", ts_secs).unwrap();
    write!(buf, "{}\n", nonce).unwrap();
    write!(buf, "{}\n", method).unwrap();
    write!(buf, "{}\n", resource).unwrap();
    write!(buf, "{}\n", host.to_ascii_lowercase()).unwrap();
    write!(buf, "{}\n", port).unwrap();
    write!(buf, "{}\n", hash.map(b64::encode).unwrap_or_default()).unwrap();
    write!(buf, "{}\n", ext.unwrap_or("")).unwrap();
    if let Some(app) = app {
        write!(buf, "{}\n", app).unwrap();
        write!(buf, "{}\n", dlg.unwrap_or("")).unwrap();
    }
    buf
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::DigestAlgorithm;
    use std::time::Duration;

    fn key() -> Key {
        Key::new(b"a secret key", DigestAlgorithm::Sha256).unwrap()
    }

    fn ts() -> SystemTime {
        std::time::UNIX_EPOCH + Duration::new(1_353_832_234, 0)
    }

    #[test]
    fn normalized_string_minimal() {
        let buf = normalized_string(
            MacType::Header,
            ts(),
            "j4h3g2",
            "GET",
            "site.com",
            80,
            "/foo?bar=1",
            None,
            None,
            None,
            None,
        );
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "hawk.1.header\n1353832234\nj4h3g2\nGET\n/foo?bar=1\nsite.com\n80\n\n\n"
        );
    }

    #[test]
    fn normalized_string_with_app_no_dlg() {
        let buf = normalized_string(
            MacType::Header,
            ts(),
            "n",
            "GET",
            "site.com",
            80,
            "/",
            None,
            None,
            Some("my-app"),
            None,
        );
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "hawk.1.header\n1353832234\nn\nGET\n/\nsite.com\n80\n\n\nmy-app\n\n"
        );
    }

    #[test]
    fn host_is_lowercased() {
        let buf = normalized_string(
            MacType::Header,
            ts(),
            "n",
            "GET",
            "SITE.COM",
            80,
            "/",
            None,
            None,
            None,
            None,
        );
        assert!(String::from_utf8(buf).unwrap().contains("\nsite.com\n"));
    }

    #[test]
    fn same_inputs_same_mac() {
        let k = key();
        let a = Mac::new(
            MacType::Header,
            &k,
            ts(),
            "n",
            "GET",
            "site.com",
            80,
            "/",
            None,
            None,
            None,
            None,
        )
        .unwrap();
        let b = Mac::new(
            MacType::Header,
            &k,
            ts(),
            "n",
            "GET",
            "site.com",
            80,
            "/",
            None,
            None,
            None,
            None,
        )
        .unwrap();
        assert!(a.verify(&b));
    }

    #[test]
    fn different_method_different_mac() {
        let k = key();
        let a = Mac::new(
            MacType::Header,
            &k,
            ts(),
            "n",
            "GET",
            "site.com",
            80,
            "/",
            None,
            None,
            None,
            None,
        )
        .unwrap();
        let b = Mac::new(
            MacType::Header,
            &k,
            ts(),
            "n",
            "POST",
            "site.com",
            80,
            "/",
            None,
            None,
            None,
            None,
        )
        .unwrap();
        assert!(!a.verify(&b));
    }
}
