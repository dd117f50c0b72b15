//! Cookie value codec.
//!
//! Values are base64 (standard alphabet) by default; percent-encoding is the
//! fallback representation. Decoding tries both in that order.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieEncoding {
    #[default]
    Base64,
    Percent,
}

pub fn encode_cookie_value(text: &str, encoding: CookieEncoding) -> String {
    match encoding {
        CookieEncoding::Base64 => STANDARD.encode(text.as_bytes()),
        CookieEncoding::Percent => utf8_percent_encode(text, NON_ALPHANUMERIC).to_string(),
    }
}

/// Decode a value produced by [`encode_cookie_value`]. `accept` decides
/// whether a decoded candidate is the payload (e.g. it parses as JSON);
/// `None` when neither representation yields an accepted payload.
pub fn decode_cookie_value<F>(value: &str, accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let from_base64 = STANDARD
        .decode(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .filter(|text| accept(text));
    if from_base64.is_some() {
        return from_base64;
    }

    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|text| text.into_owned())
        .filter(|text| accept(text))
}
