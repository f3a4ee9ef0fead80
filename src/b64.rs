//! Base64 handling used throughout Hawk header values.
//!
//! Only the standard, padded alphabet is needed by the core covered here (it is
//! what the wire format uses for `mac` and `hash` attributes).

pub(crate) const STANDARD: base64::Config = base64::STANDARD;

pub(crate) fn encode<T: AsRef<[u8]>>(input: T) -> String {
    base64::encode_config(input, STANDARD)
}

pub(crate) fn decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, base64::DecodeError> {
    base64::decode_config(input, STANDARD)
}
