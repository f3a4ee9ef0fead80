//! Hawk is an HTTP authentication scheme using a message authentication code
//! (MAC) algorithm to provide partial cryptographic verification for requests
//! and responses exchanged over HTTP. This crate implements the sender and
//! receiver halves of a Hawk exchange, independent of any particular HTTP
//! client or server.
//!
//! # Examples
//!
//! ```
//! use hawk_auth::{Credentials, Options, Sender, Receiver};
//! use hawk_auth::clock::SystemClock;
//!
//! let credentials = Credentials::new("my-client-id", b"a secret key".to_vec(), "sha256").unwrap();
//! let clock = SystemClock;
//!
//! // the client signs its request; scheme determines the default port (80/443)
//! // when none is given explicitly
//! let sender = Sender::new(
//!     &credentials,
//!     &clock,
//!     "GET",
//!     "https",
//!     "example.com",
//!     None,
//!     "/resource",
//!     Options::new().payload(b"", ""),
//! ).unwrap();
//! let authorization = sender.header().to_string();
//!
//! // the server looks credentials up by the id carried in the header
//! let credentials_map = |id: &str| -> Result<hawk_auth::Credentials, failure::Error> {
//!     if id == "my-client-id" {
//!         Ok(hawk_auth::Credentials::new("my-client-id", b"a secret key".to_vec(), "sha256")?)
//!     } else {
//!         Err(failure::err_msg("unknown credentials id"))
//!     }
//! };
//!
//! // the server verifies it and signs a response
//! let receiver = Receiver::new(
//!     &credentials_map,
//!     &clock,
//!     "GET",
//!     "https",
//!     "example.com",
//!     None,
//!     "/resource",
//!     &authorization,
//!     Options::new().payload(b"", ""),
//! ).unwrap();
//! let server_authorization = receiver.respond(Options::new().payload(b"", "")).unwrap();
//!
//! // the client verifies the response came from the same server
//! sender.validate_response(&clock, &server_authorization, None, None, Options::new()).unwrap();
//! ```

pub mod clock;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod header;
mod b64;
mod mac;
pub mod nonce;
pub mod options;
pub mod payload;
pub mod receiver;
pub mod request;
pub mod response;
pub mod sender;

pub use crate::credentials::{Credentials, Key};
pub use crate::crypto::DigestAlgorithm;
pub use crate::error::{Error, Result};
pub use crate::header::Header;
pub use crate::mac::Mac;
pub use crate::options::Options;
pub use crate::payload::PayloadHasher;
pub use crate::receiver::Receiver;
pub use crate::request::{Request, RequestBuilder, RequestState};
pub use crate::response::{Response, ResponseBuilder};
pub use crate::sender::Sender;
