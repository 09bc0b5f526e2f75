//! Base64 helpers for integers, e.g. the `n`, `e` and `d` members of a JWK.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use rsa::BigUint;

use crate::Error;

/// Decodes a big-endian integer from base64.
///
/// Both the standard and the URL-safe alphabets are accepted, with or
/// without padding.
pub fn int_from_base64(s: &str) -> Result<BigUint, Error> {
    let s = s.trim();
    let bytes = [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(s).ok())
        .ok_or(Error::EncodingError)?;
    if bytes.is_empty() {
        return Err(Error::EncodingError);
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Encodes an integer as minimal big-endian bytes in standard base64.
pub fn int_to_base64(n: &BigUint) -> String {
    STANDARD.encode(n.to_bytes_be())
}
