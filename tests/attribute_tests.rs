mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use brrtrouter_accesslog::attribute::{
    format_response_time, AttributeError, ConstantAttribute, ExchangeAttribute,
    QuotingAttribute, RequestCookieAttribute, RequestHeaderAttribute, ResponseHeaderAttribute,
    SharedAttribute, SubstituteEmptyAttribute, TimeUnit, UserDataAttribute, BYTES_SENT_DASH,
    RESPONSE_CODE, RESPONSE_TIME_MILLIS, SSL_CIPHER,
};
use brrtrouter_accesslog::exchange::{Exchange, HttpExchange};
use common::exchanges::pet_listing;
use http::header::{ACCEPT, CACHE_CONTROL};
use http::{HeaderValue, Method, StatusCode};

fn constant(value: &str) -> SharedAttribute {
    Arc::new(ConstantAttribute::new(value))
}

#[test]
fn test_header_value_counts() {
    let accept = RequestHeaderAttribute::new(ACCEPT);

    let none = HttpExchange::builder(Method::GET, "/").build();
    assert_eq!(accept.read(&none), None);

    let one = HttpExchange::builder(Method::GET, "/")
        .request_header(ACCEPT, HeaderValue::from_static("a"))
        .build();
    assert_eq!(accept.read(&one).as_deref(), Some("a"));

    let two = HttpExchange::builder(Method::GET, "/")
        .request_header(ACCEPT, HeaderValue::from_static("a"))
        .request_header(ACCEPT, HeaderValue::from_static("b"))
        .build();
    assert_eq!(accept.read(&two).as_deref(), Some("[a, b]"));
}

#[test]
fn test_bytes_sent_dash() {
    let mut exchange = HttpExchange::builder(Method::GET, "/").build();
    exchange.finish(StatusCode::OK, 0);
    assert_eq!(BYTES_SENT_DASH.read(&exchange).as_deref(), Some("-"));
    exchange.finish(StatusCode::OK, 1024);
    assert_eq!(BYTES_SENT_DASH.read(&exchange).as_deref(), Some("1024"));
}

#[test]
fn test_quoting() {
    let exchange = pet_listing();
    let missing = QuotingAttribute::new(Arc::clone(&SSL_CIPHER));
    assert_eq!(missing.read(&exchange).as_deref(), Some("-"));

    let dash = QuotingAttribute::new(constant("-"));
    assert_eq!(dash.read(&exchange).as_deref(), Some("-"));

    let plain = QuotingAttribute::new(constant("curl"));
    assert_eq!(plain.read(&exchange).as_deref(), Some("'curl'"));

    // the character after an embedded quote is dropped
    let irish = QuotingAttribute::new(constant("O'Brien"));
    assert_eq!(irish.read(&exchange).as_deref(), Some("'O'\"rien'"));
}

#[test]
fn test_substitute_empty() {
    let exchange = pet_listing();
    let empty = SubstituteEmptyAttribute::new(constant(""), "-");
    assert_eq!(empty.read(&exchange).as_deref(), Some("-"));
    let missing = SubstituteEmptyAttribute::new(Arc::clone(&SSL_CIPHER), "n/a");
    assert_eq!(missing.read(&exchange).as_deref(), Some("n/a"));
    let present = SubstituteEmptyAttribute::new(Arc::clone(&RESPONSE_CODE), "-");
    assert_eq!(present.read(&exchange).as_deref(), Some("200"));
}

#[test]
fn test_seconds_truncate_to_hundredths() {
    assert_eq!(format_response_time(Duration::from_millis(1234), TimeUnit::Seconds), "1.23");
    assert_eq!(format_response_time(Duration::from_millis(1239), TimeUnit::Seconds), "1.23");
    assert_eq!(format_response_time(Duration::from_millis(5), TimeUnit::Seconds), "0.00");
    assert_eq!(format_response_time(Duration::from_millis(60_010), TimeUnit::Seconds), "60.01");
    assert_eq!(
        format_response_time(Duration::from_micros(1500), TimeUnit::Microseconds),
        "1500"
    );
}

#[test]
fn test_response_time_is_cached_once_ended() {
    let start = Instant::now()
        .checked_sub(Duration::from_millis(250))
        .unwrap_or_else(Instant::now);
    let mut exchange = HttpExchange::builder(Method::GET, "/")
        .request_start(start)
        .build();
    exchange.finish(StatusCode::OK, 10);

    let first = RESPONSE_TIME_MILLIS.read(&exchange).unwrap();
    std::thread::sleep(Duration::from_millis(20));
    let second = RESPONSE_TIME_MILLIS.read(&exchange).unwrap();
    assert_eq!(first, second);
    assert!(exchange.first_response_time().is_some());
}

#[test]
fn test_writes_reach_the_exchange() {
    let mut exchange = HttpExchange::builder(Method::GET, "/").build();

    RESPONSE_CODE.write(&mut exchange, " 418 ").unwrap();
    assert_eq!(exchange.status(), StatusCode::IM_A_TEAPOT);

    let cache = ResponseHeaderAttribute::new(CACHE_CONTROL);
    cache.write(&mut exchange, "no-store").unwrap();
    assert_eq!(cache.read(&exchange).as_deref(), Some("no-store"));

    let accept = RequestHeaderAttribute::new(ACCEPT);
    accept.write(&mut exchange, "text/plain").unwrap();
    assert_eq!(accept.read(&exchange).as_deref(), Some("text/plain"));

    RequestCookieAttribute::new("session")
        .write(&mut exchange, "fresh")
        .unwrap();
    assert_eq!(exchange.response_cookie("session").as_deref(), Some("fresh"));

    UserDataAttribute::new("tenant")
        .write(&mut exchange, "acme")
        .unwrap();
    assert_eq!(exchange.data("tenant"), Some("acme"));
}

#[test]
fn test_rejected_writes() {
    let mut exchange = HttpExchange::builder(Method::GET, "/").build();

    let err = RESPONSE_CODE.write(&mut exchange, "99999").unwrap_err();
    assert_eq!(err, AttributeError::invalid_value("Response code", "99999"));

    let err = RequestHeaderAttribute::new(ACCEPT)
        .write(&mut exchange, "bad\nvalue")
        .unwrap_err();
    assert!(matches!(err, AttributeError::InvalidValue { .. }));

    let err = SSL_CIPHER.write(&mut exchange, "NULL").unwrap_err();
    assert_eq!(err.to_string(), "Could not set read only attribute SSL cipher to 'NULL'");

    let err = constant("x").write(&mut exchange, "y").unwrap_err();
    assert!(matches!(err, AttributeError::ReadOnly { .. }));
}
