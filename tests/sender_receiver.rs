//! Integration tests driving `Sender`/`Receiver` directly, with no HTTP transport
//! in between (transport is explicitly out of scope). Covers the seed scenarios:
//! baseline GET, tamper host, content-type parameter drift, replay, expired
//! timestamp with a skew override, response binding, `ext` containing quotes/
//! newlines/illegal characters, and scheme tampering.

use hawk_auth::clock::FixedClock;
use hawk_auth::nonce::NonceCache;
use hawk_auth::{Credentials, Options, Receiver, Sender};
use std::time::{Duration, UNIX_EPOCH};

fn credentials() -> Credentials {
    Credentials::new("dh37fgj492je", b"werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn".to_vec(), "sha256")
        .unwrap()
}

/// Stands in for a database-backed `credentials_map`: recognizes exactly one id.
fn credentials_map() -> impl Fn(&str) -> std::result::Result<Credentials, failure::Error> {
    |id: &str| {
        if id == "dh37fgj492je" {
            Ok(credentials())
        } else {
            Err(failure::err_msg("unknown credentials id"))
        }
    }
}

fn clock_at(secs: u64) -> FixedClock {
    FixedClock(UNIX_EPOCH + Duration::new(secs, 0))
}

/// A seed-scenario-style options baseline: an explicit empty payload, the same
/// way the seed scenarios sign an empty body rather than omitting one (S1:
/// `content`/`content_type` are `""`, not absent).
fn no_body() -> Options<'static> {
    Options::new().payload(b"", "")
}

#[test]
fn s1_baseline_get_round_trips() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource/1?b=1&a=2",
        no_body(),
    )
    .unwrap();

    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource/1?b=1&a=2",
        sender.header(),
        no_body(),
    )
    .unwrap();

    let server_header = receiver.respond(no_body()).unwrap();
    assert!(sender
        .validate_response(&clock, &server_header, None, None, Options::new())
        .is_ok());
}

#[test]
fn s2_tampered_host_is_rejected() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource/1",
        no_body(),
    )
    .unwrap();

    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "attacker.example.com",
        Some(8000),
        "/resource/1",
        sender.header(),
        no_body(),
    );
    assert!(receiver.is_err());
}

#[test]
fn s3_content_type_parameter_drift_is_tolerated() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &clock,
        "POST",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        Options::new().payload(b"{\"hello\":1}", "application/json; charset=utf8"),
    )
    .unwrap();

    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "POST",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        Options::new().payload(b"{\"hello\":1}", "application/json; charset=iso-8859-1"),
    );
    assert!(receiver.is_ok());
}

#[test]
fn s4_replayed_nonce_is_rejected() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);
    let cache = NonceCache::new();

    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body(),
    )
    .unwrap();

    let first = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body().seen_nonce(&|n, t| cache.seen_nonce(n, t)),
    );
    assert!(first.is_ok());

    let replay = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body().seen_nonce(&|n, t| cache.seen_nonce(n, t)),
    );
    assert!(replay.is_err());
}

#[test]
fn s5_expired_timestamp_rejected_then_accepted_with_wider_skew() {
    let creds = credentials();
    let signing_clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &signing_clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body(),
    )
    .unwrap();

    // receiver's clock is 10 minutes ahead of the sender's
    let verifying_clock = clock_at(1_353_832_234 + 600);

    let rejected = Receiver::new(
        &credentials_map(),
        &verifying_clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body(),
    );
    assert!(rejected.is_err());

    let accepted = Receiver::new(
        &credentials_map(),
        &verifying_clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body().timestamp_skew(Duration::from_secs(700)),
    );
    assert!(accepted.is_ok());
}

#[test]
fn s6_response_binds_to_the_original_request() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body(),
    )
    .unwrap();
    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body(),
    )
    .unwrap();
    let server_header = receiver.respond(no_body().ext("server-ext")).unwrap();
    assert!(sender
        .validate_response(&clock, &server_header, None, None, Options::new())
        .is_ok());

    // a response signed for a different request does not validate against this sender
    let other_sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/other-resource",
        no_body(),
    )
    .unwrap();
    let other_receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/other-resource",
        other_sender.header(),
        no_body(),
    )
    .unwrap();
    let other_server_header = other_receiver.respond(no_body()).unwrap();
    assert!(sender
        .validate_response(&clock, &other_server_header, None, None, Options::new())
        .is_err());
}

#[test]
fn s7_ext_with_quotes_newline_and_illegal_chars() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    // embedded doubled quotes and a newline both round-trip through sign+verify
    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body().ext("quotes=\"\" and a\nnewline"),
    )
    .unwrap();

    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        sender.header(),
        no_body(),
    )
    .unwrap();
    assert_eq!(receiver.ext(), Some("quotes=\"\" and a\nnewline"));

    // a TAB is an illegal ext character and is rejected at signing time, not verification
    let illegal = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body().ext("illegal\ttab"),
    );
    assert!(illegal.is_err());
}

#[test]
fn s8_tampered_scheme_is_rejected() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    // signed without an explicit port, over plain http (defaults to port 80)...
    let sender = Sender::new(&creds, &clock, "GET", "http", "example.com", None, "/resource", no_body()).unwrap();

    // ...but the receiver is told it arrived over https (defaults to port 443):
    // same header, different implied port, so the MAC no longer matches
    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "https",
        "example.com",
        None,
        "/resource",
        sender.header(),
        no_body(),
    );
    assert!(receiver.is_err());
}

#[test]
fn s9_tampered_port_is_rejected() {
    let creds = credentials();
    let clock = clock_at(1_353_832_234);

    let sender = Sender::new(
        &creds,
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8000),
        "/resource",
        no_body(),
    )
    .unwrap();

    let receiver = Receiver::new(
        &credentials_map(),
        &clock,
        "GET",
        "http",
        "example.com",
        Some(8001),
        "/resource",
        sender.header(),
        no_body(),
    );
    assert!(receiver.is_err());
}
