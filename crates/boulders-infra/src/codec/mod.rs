pub mod cookie_value;

pub use cookie_value::{decode_cookie_value, encode_cookie_value, CookieEncoding};
