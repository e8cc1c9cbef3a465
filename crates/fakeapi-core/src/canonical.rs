//! URL canonicalization.
//!
//! A logical request can be reported by client libraries in two shapes: fully
//! percent-encoded (what `requests`-style clients echo in `response.url`), or
//! with the query left human-readable. Both shapes are produced here so that the
//! key deriver can try each against the registered configuration.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Bytes left literal when re-quoting a whole URL: unreserved characters,
/// reserved delimiters and `%` itself.
const REQUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'%')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@')
    .remove(b'[')
    .remove(b']');

/// Bytes left literal in a form-encoded query component: alphanumerics and
/// `-._~`. Space is written as `+` separately.
const FORM_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Used when the URL carries a broken escape such as `%zz`: `%` gets quoted too.
const REQUOTE_STRICT: &AsciiSet = &REQUOTE.add(b'%');

/// A URL split at its query and fragment delimiters.
struct UrlParts<'a> {
    base: &'a str,
    query: &'a str,
    fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    fn split(url: &'a str) -> Self {
        let (rest, fragment) = url.split_once('#').unwrap_or((url, ""));
        let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self { base, query, fragment }
    }
}

/// Flattens a parameter mapping into ordered `(key, value)` pairs.
///
/// Objects contribute their fields in insertion order, arrays contribute their
/// `[key, value]` pairs. Any other shape contributes nothing.
///
/// Strings are used verbatim; booleans and null are spelled `True`, `False`
/// and `None`, as recorded fixture keys carry them. Numbers, arrays and objects
/// use their compact JSON text.
pub fn query_pairs(params: Option<&Value>) -> Vec<(String, String)> {
    match params {
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(key, value)| (key.clone(), query_value(value)))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_array().map(Vec::as_slice) {
                Some([key, value]) => Some((query_value(key), query_value(value))),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// `application/x-www-form-urlencoded` component: reserved bytes such as `*`
/// and `/` become `%XX`, space becomes `+`.
fn form_encode(component: &str) -> String {
    component
        .split(' ')
        .map(|chunk| utf8_percent_encode(chunk, FORM_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

fn encoded_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn readable_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes escapes of unreserved characters, keeps every other escape as is.
/// Returns `None` on an escape that is two alphanumerics but not hex.
fn unquote_unreserved(uri: &str) -> Option<String> {
    let mut out = String::with_capacity(uri.len());
    let mut parts = uri.split('%');
    if let Some(head) = parts.next() {
        out.push_str(head);
    }
    for part in parts {
        let hex = part
            .get(..2)
            .filter(|h| h.bytes().all(|b| b.is_ascii_alphanumeric()));
        match hex {
            Some(hex) => {
                let byte = u8::from_str_radix(hex, 16).ok()?;
                if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
                    out.push(char::from(byte));
                    out.push_str(&part[2..]);
                } else {
                    out.push('%');
                    out.push_str(part);
                }
            }
            None => {
                out.push('%');
                out.push_str(part);
            }
        }
    }
    Some(out)
}

/// Re-quotes a URL so that it is fully and consistently percent-encoded.
/// Applying it twice yields the same string as applying it once.
pub fn requote(uri: &str) -> String {
    match unquote_unreserved(uri) {
        Some(unquoted) => utf8_percent_encode(&unquoted, REQUOTE).to_string(),
        None => utf8_percent_encode(uri, REQUOTE_STRICT).to_string(),
    }
}

/// Merges `params` into the query of `url`.
///
/// With `encode` the whole URL is re-quoted (`foo bar` becomes `foo+bar` in the
/// new parameters, `%20` in a pre-existing query, `/` in values becomes `%2F`).
/// Without it the new parameters stay readable and the rest of `url` is kept
/// as given.
pub fn canonicalize(url: &str, params: Option<&Value>, encode: bool) -> String {
    let pairs = query_pairs(params);
    let parts = UrlParts::split(url);
    let extra = if encode {
        encoded_query(&pairs)
    } else {
        readable_query(&pairs)
    };

    let query = parts
        .query
        .split('&')
        .chain(extra.split('&'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("&");

    let mut out = String::with_capacity(url.len() + extra.len() + 1);
    out.push_str(parts.base);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    if !parts.fragment.is_empty() {
        out.push('#');
        out.push_str(parts.fragment);
    }

    if encode {
        requote(&out)
    } else {
        out
    }
}

/// `url` with `params` merged in, percent-encoded.
pub fn encoded_url(url: &str, params: Option<&Value>) -> String {
    canonicalize(url, params, true)
}

/// `url` with `params` merged in, human-readable.
pub fn readable_url(url: &str, params: Option<&Value>) -> String {
    canonicalize(url, params, false)
}
