//! The `Authorization`/`Server-Authorization` header value: `Hawk key="value", ...`.

use crate::error::{Error, Result};
use crate::mac::Mac;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A parsed or about-to-be-emitted Hawk header value (the part after `"Hawk "`).
///
/// All fields are optional at this layer; `Sender`/`Receiver` enforce which ones
/// are required for a request versus a response header.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Header {
    pub id: Option<String>,
    pub ts: Option<SystemTime>,
    pub nonce: Option<String>,
    pub mac: Option<Mac>,
    pub hash: Option<Vec<u8>>,
    pub ext: Option<String>,
    pub app: Option<String>,
    pub dlg: Option<String>,
}

impl Header {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<String>,
        ts: Option<SystemTime>,
        nonce: Option<String>,
        mac: Option<Mac>,
        hash: Option<Vec<u8>>,
        ext: Option<String>,
        app: Option<String>,
        dlg: Option<String>,
    ) -> Result<Header> {
        if let Some(ref v) = ext {
            check_component(v)?;
        }
        if let Some(ref v) = app {
            check_component(v)?;
        }
        if let Some(ref v) = dlg {
            check_component(v)?;
        }
        if let Some(ref v) = id {
            check_component(v)?;
        }
        if let Some(ref v) = nonce {
            check_component(v)?;
        }
        Ok(Header {
            id,
            ts,
            nonce,
            mac,
            hash,
            ext,
            app,
            dlg,
        })
    }

    /// Render as the full `Authorization`/`Server-Authorization` value, including
    /// the leading `Hawk ` scheme token.
    pub fn to_header_string(&self) -> String {
        format!("Hawk {}", self)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut sep = "";
        if let Some(ref id) = self.id {
            write!(f, "{}id=\"{}\"", sep, id)?;
            sep = ", ";
        }
        if let Some(ts) = self.ts {
            let secs = ts.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
            write!(f, "{}ts=\"{}\"", sep, secs)?;
            sep = ", ";
        }
        if let Some(ref nonce) = self.nonce {
            write!(f, "{}nonce=\"{}\"", sep, nonce)?;
            sep = ", ";
        }
        if let Some(ref hash) = self.hash {
            write!(f, "{}hash=\"{}\"", sep, crate::b64::encode(hash))?;
            sep = ", ";
        }
        if let Some(ref ext) = self.ext {
            write!(f, "{}ext=\"{}\"", sep, ext)?;
            sep = ", ";
        }
        if let Some(ref mac) = self.mac {
            write!(f, "{}mac=\"{}\"", sep, mac.to_base64())?;
            sep = ", ";
        }
        if let Some(ref app) = self.app {
            write!(f, "{}app=\"{}\"", sep, app)?;
            sep = ", ";
        }
        if let Some(ref dlg) = self.dlg {
            write!(f, "{}dlg=\"{}\"", sep, dlg)?;
        }
        Ok(())
    }
}

/// Check a header component against Hawk's allowed character class: printable
/// ASCII (0x20-0x7E) plus newline, never a literal `"` or `\`, and never TAB.
///
/// This is checked at the *byte* level, after any UTF-8 decoding, so a caller
/// cannot smuggle non-ASCII scalars in by relying on `char`-level checks missing
/// multi-byte sequences.
pub(crate) fn check_component(value: &str) -> Result<()> {
    for &b in value.as_bytes() {
        let ok = b == b'\n' || (0x20..=0x7e).contains(&b);
        if !ok || b == b'"' || b == b'\\' {
            return Err(Error::BadHeaderValue(format!(
                "value contains a disallowed character: {:?}",
                value
            )));
        }
    }
    Ok(())
}

/// Parse a full `Authorization`/`Server-Authorization` header value, including the
/// leading `Hawk` scheme token (matched case-insensitively).
///
/// The tokenizer is hand-rolled, not regex-based, and deliberately tolerates two
/// quirks real Hawk traffic exhibits: an `ext` value containing a literal `""`
/// pair (`key=""…""`), and an `ext` value containing an embedded newline.
pub fn parse_header(s: &str) -> Result<Header> {
    let s = s.trim();
    let rest = if s.len() >= 4 && s[..4].eq_ignore_ascii_case("hawk") {
        &s[4..]
    } else {
        return Err(Error::BadHeaderValue(
            "header does not start with the Hawk scheme token".to_string(),
        ));
    };

    let mut id = None;
    let mut ts = None;
    let mut nonce = None;
    let mut mac = None;
    let mut hash = None;
    let mut ext = None;
    let mut app = None;
    let mut dlg = None;

    let mut p = rest;
    loop {
        p = p.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if p.is_empty() {
            break;
        }

        let eq = p
            .find('=')
            .ok_or_else(|| Error::BadHeaderValue("missing '=' in attribute".to_string()))?;
        let name = p[..eq].trim();
        p = p[eq + 1..].trim_start();
        if !p.starts_with('"') {
            return Err(Error::BadHeaderValue(
                "attribute value must start with '\"'".to_string(),
            ));
        }
        p = &p[1..];

        let end = find_value_end(p)?;
        let value = &p[..end];

        match name {
            "id" => id = Some(value.to_string()),
            "ts" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| Error::BadHeaderValue(format!("invalid ts {:?}", value)))?;
                ts = Some(UNIX_EPOCH + Duration::new(secs, 0));
            }
            "nonce" => nonce = Some(value.to_string()),
            "mac" => mac = Some(Mac::from_base64(value)?),
            "hash" => hash = Some(crate::b64::decode(value)?),
            "ext" => ext = Some(value.to_string()),
            "app" => app = Some(value.to_string()),
            "dlg" => dlg = Some(value.to_string()),
            // unknown attributes are tolerated and ignored, per the header codec rules
            _ => {}
        }

        p = &p[end + 1..];
        if p.is_empty() {
            break;
        }
    }

    if let Some(ref dlg_value) = dlg {
        if app.is_none() {
            return Err(Error::BadHeaderValue(format!(
                "dlg present ({:?}) without app",
                dlg_value
            )));
        }
    }

    Header::new(id, ts, nonce, mac, hash, ext, app, dlg)
}

/// Find the index of the closing `"` for an attribute value starting at `p`.
///
/// Most values end at the first `"`. But `ext` (and, conservatively, any value) may
/// itself contain literal `"` characters — real Hawk clients emit values like
/// `quotes=""`, serialized as `ext="quotes=""""`. To tell a literal quote from the
/// true terminator, a candidate `"` is only accepted as the terminator if what
/// follows it (after optional whitespace and a comma) is either the end of the
/// header or another `name=` attribute — i.e. the boundary is conservative, not a
/// simple first-quote match.
fn find_value_end(p: &str) -> Result<usize> {
    let mut search_from = 0;
    loop {
        let rel = p[search_from..]
            .find('"')
            .ok_or_else(|| Error::BadHeaderValue("unterminated attribute value".to_string()))?;
        let pos = search_from + rel;
        let after = p[pos + 1..].trim_start();
        if after.is_empty() {
            return Ok(pos);
        }
        if let Some(after_comma) = after.strip_prefix(',') {
            let after_comma = after_comma.trim_start();
            if after_comma.is_empty() || starts_with_attr_name(after_comma) {
                return Ok(pos);
            }
        }
        search_from = pos + 1;
    }
}

/// Whether `s` looks like it begins a new `name="value"` attribute (used to decide
/// whether a `"` we just saw was a real terminator or a literal quote inside the
/// current value).
fn starts_with_attr_name(s: &str) -> bool {
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    name_end > 0 && s[name_end..].trim_start().starts_with('=')
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mac(bytes: Vec<u8>) -> Mac {
        Mac::from(bytes)
    }

    #[test]
    fn illegal_id() {
        assert!(Header::new(
            Some("ab\"cdef".to_string()),
            None,
            Some("nonce".to_string()),
            None,
            None,
            None,
            None,
            None
        )
        .is_err());
    }

    #[test]
    fn illegal_ext_tab() {
        assert!(check_component("something like \t is illegal").is_err());
    }

    #[test]
    fn illegal_ext_non_ascii() {
        assert!(check_component("Ivan Kristi\u{107}").is_err());
    }

    #[test]
    fn from_str_minimal() {
        let h = parse_header(
            "Hawk id=\"xyz\", ts=\"1353832234\", nonce=\"abc\", \
             mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\"",
        )
        .unwrap();
        assert_eq!(h.id, Some("xyz".to_string()));
        assert_eq!(h.nonce, Some("abc".to_string()));
        assert_eq!(h.ext, None);
        assert_eq!(h.app, None);
    }

    #[test]
    fn from_str_messy_whitespace_and_commas() {
        let h = parse_header(
            "Hawk , id  =  \"dh37fgj492je\", ts=\"1353832234\", \
             nonce=\"j4h3g2\"  , , ext=\"some-app-ext-data\", \
             mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\"",
        )
        .unwrap();
        assert_eq!(h.id, Some("dh37fgj492je".to_string()));
        assert_eq!(h.ext, Some("some-app-ext-data".to_string()));
    }

    #[test]
    fn dlg_without_app_is_rejected() {
        assert!(parse_header(
            "Hawk id=\"x\", ts=\"1\", nonce=\"n\", mac=\"AAAA\", dlg=\"d\""
        )
        .is_err());
    }

    #[test]
    fn ext_with_doubled_quotes_round_trips() {
        let h = parse_header("Hawk id=\"x\", ts=\"1\", nonce=\"n\", ext=\"quotes=\"\"\", mac=\"AAAA\"")
            .unwrap();
        assert_eq!(h.ext, Some("quotes=\"\"".to_string()));
    }

    #[test]
    fn ext_with_embedded_newline() {
        let h = parse_header(
            "Hawk id=\"x\", ts=\"1\", nonce=\"n\", ext=\"new line \n in the middle\", mac=\"AAAA\"",
        )
        .unwrap();
        assert_eq!(h.ext, Some("new line \n in the middle".to_string()));
    }

    #[test]
    fn to_string_round_trip() {
        let h = Header::new(
            Some("dh37fgj492je".to_string()),
            Some(UNIX_EPOCH + Duration::new(1_353_832_234, 0)),
            Some("j4h3g2".to_string()),
            Some(mac(vec![1, 2, 3, 4])),
            None,
            Some("my-ext-value".to_string()),
            Some("my-app".to_string()),
            Some("my-dlg".to_string()),
        )
        .unwrap();
        let formatted = h.to_header_string();
        let parsed = parse_header(&formatted).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let h = parse_header(
            "Hawk id=\"x\", ts=\"1\", nonce=\"n\", mac=\"AAAA\", bogus=\"whatever\"",
        )
        .unwrap();
        assert_eq!(h.id, Some("x".to_string()));
    }

    #[test]
    fn missing_scheme_token_is_an_error() {
        assert!(parse_header("id=\"x\", ts=\"1\", nonce=\"n\", mac=\"AAAA\"").is_err());
    }
}
