//! # Canonicalization Tests: encoded and readable URL forms
//!
//! Validates query merging, percent-encoding, insertion order and the
//! idempotence of the encoded form.

use fakeapi_core::canonical::{canonicalize, encoded_url, query_pairs, readable_url, requote};
use serde_json::json;
use std::time::Instant;

/// Re-canonicalizing an encoded URL with no further parameters is a no-op.
#[test]
fn test_encoded_form_is_idempotent() {
    let t = Instant::now();

    let params = json!({"test": "yop man/yop"});
    let once = canonicalize("http://localhost/api?t=yop man/yop", Some(&params), true);
    assert_eq!(once, "http://localhost/api?t=yop%20man/yop&test=yop+man%2Fyop");

    let twice = canonicalize(&once, None, true);
    assert_eq!(twice, once, "Encoded form changed on second pass");
    assert_eq!(canonicalize(&twice, Some(&json!({})), true), once);

    let overhead = t.elapsed();
    println!("test_encoded_form_is_idempotent: Testing Overhead = {:?}", overhead);
}

#[test]
fn test_space_encoding_round_trip() {
    let params = json!({"name": "foo bar"});

    assert_eq!(encoded_url("http://localhost/api", Some(&params)), "http://localhost/api?name=foo+bar");
    assert_eq!(readable_url("http://localhost/api", Some(&params)), "http://localhost/api?name=foo bar");
}

#[test]
fn test_slash_in_value() {
    let body = json!({"name": "foo/bar"});

    assert_eq!(encoded_url("/api/1", Some(&body)), "/api/1?name=foo%2Fbar");
    assert_eq!(readable_url("/api/1", Some(&body)), "/api/1?name=foo/bar");
}

/// Reserved characters in new parameters are escaped, `-._~` stay literal.
#[test]
fn test_reserved_characters_in_value() {
    let params = json!({"q": "a*b", "r": "x:y@z", "u": "-._~"});

    assert_eq!(
        encoded_url("http://h/p", Some(&params)),
        "http://h/p?q=a%2Ab&r=x%3Ay%40z&u=-._~"
    );
    assert_eq!(readable_url("http://h/p", Some(&params)), "http://h/p?q=a*b&r=x:y@z&u=-._~");

    let once = encoded_url("http://h/p", Some(&params));
    assert_eq!(canonicalize(&once, None, true), once);
}

#[test]
fn test_boolean_and_null_values() {
    let params = json!({"active": true, "deleted": false, "owner": null});

    assert_eq!(
        encoded_url("http://h/p", Some(&params)),
        "http://h/p?active=True&deleted=False&owner=None"
    );
}

/// Readable form keeps a pre-existing query exactly as given.
#[test]
fn test_readable_form_keeps_existing_query() {
    let params = json!({"test": "yop man/yop"});
    let url = readable_url("http://localhost/api?t=yop man/yop", Some(&params));

    assert_eq!(url, "http://localhost/api?t=yop man/yop&test=yop man/yop");
}

#[test]
fn test_insertion_order_is_preserved() {
    let params = json!({"zeta": 1, "alpha": "x"});

    assert_eq!(encoded_url("http://h/p", Some(&params)), "http://h/p?zeta=1&alpha=x");
    assert_eq!(readable_url("http://h/p", Some(&params)), "http://h/p?zeta=1&alpha=x");
}

#[test]
fn test_empty_segments_are_stripped() {
    assert_eq!(encoded_url("http://localhost/api", None), "http://localhost/api");
    assert_eq!(readable_url("http://localhost/api", None), "http://localhost/api");
    assert_eq!(encoded_url("http://localhost/api?", Some(&json!({}))), "http://localhost/api");
    assert_eq!(
        encoded_url("http://localhost/api?a=1&", Some(&json!({"b": 2}))),
        "http://localhost/api?a=1&b=2"
    );
}

#[test]
fn test_fragment_stays_last() {
    let url = encoded_url("http://h/p#frag", Some(&json!({"a": "b"})));
    assert_eq!(url, "http://h/p?a=b#frag");
}

#[test]
fn test_requote_escapes() {
    // Non-ASCII is UTF-8 percent-encoded.
    assert_eq!(requote("http://localhost/café"), "http://localhost/caf%C3%A9");
    // Escapes of unreserved characters are decoded, others kept.
    assert_eq!(requote("http://h/p?a=%7E&b=%2F"), "http://h/p?a=~&b=%2F");
    // A broken escape gets its `%` quoted.
    assert_eq!(requote("http://h/p?a=%zz"), "http://h/p?a=%25zz");
    // A dangling `%` is left alone.
    assert_eq!(requote("http://h/p?a=%2"), "http://h/p?a=%2");
}

#[test]
fn test_query_pairs_shapes() {
    let scalars = query_pairs(Some(&json!({"n": 1, "b": true, "x": null, "s": "v"})));
    assert_eq!(
        scalars,
        vec![
            ("n".to_string(), "1".to_string()),
            ("b".to_string(), "True".to_string()),
            ("x".to_string(), "None".to_string()),
            ("s".to_string(), "v".to_string()),
        ]
    );

    let pairs = query_pairs(Some(&json!([["a", "1"], ["b", 2], ["broken"]])));
    assert_eq!(pairs, vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]);

    assert!(query_pairs(Some(&json!("plain text"))).is_empty());
    assert!(query_pairs(Some(&json!(null))).is_empty());
    assert!(query_pairs(None).is_empty());
}
