//! HTTP response body decoding

use crate::error::{Result, WebRequestError};
use crate::utils::ParamEncoder;
use encoding_rs::Encoding;
use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, CONTENT_ENCODING};
use std::io::Read;

/// Buffer capacity used when the server does not declare a length
pub const FALLBACK_BUFFER_SIZE: usize = 4096;

/// Turns raw response bytes into text
#[derive(Debug, Clone, Copy)]
pub struct ResponseDecoder {
    encoding: &'static Encoding,
}

impl ResponseDecoder {
    pub fn new(charset: &str) -> Result<Self> {
        let encoding = ParamEncoder::for_charset(charset)?.encoding();
        Ok(Self { encoding })
    }

    /// Decode a body, decompressing first when the headers flag it as gzip.
    ///
    /// `capacity` comes from [`buffer_capacity`], checked before the body
    /// is read.
    pub fn decode(&self, headers: &HeaderMap, capacity: usize, body: &[u8]) -> Result<String> {
        if is_gzip(headers) {
            let inflated = gunzip(body, capacity)?;
            self.to_text(&inflated)
        } else {
            self.to_text(body)
        }
    }

    fn to_text(&self, bytes: &[u8]) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| {
                WebRequestError::Decode(format!(
                    "response body is not valid {}",
                    self.encoding.name()
                ))
            })
    }
}

/// Whether `Content-Encoding` says gzip, ignoring case
pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false)
}

/// Lengths beyond `i32::MAX` cannot be buffered
pub fn buffer_capacity(content_length: Option<u64>) -> Result<usize> {
    match content_length {
        Some(length) if length > i32::MAX as u64 => Err(WebRequestError::ContentTooLarge(length)),
        Some(length) if length > 0 => Ok(length as usize),
        _ => Ok(FALLBACK_BUFFER_SIZE),
    }
}

fn gunzip(body: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(body);
    let mut inflated = Vec::with_capacity(capacity);
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| WebRequestError::Decode(format!("Failed to decompress gzip data: {}", e)))?;
    Ok(inflated)
}
