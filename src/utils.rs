//! Utility functions and helpers

use crate::error::{Result, WebRequestError};
use encoding_rs::Encoding;
use url::{form_urlencoded, Url};

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str).map_err(|e| {
            WebRequestError::InvalidArgument(format!("Invalid URL '{}': {}", input, e))
        })
    }

    /// Append an already encoded query string to a URL
    pub fn append_query(url: &str, query: &str) -> String {
        if query.is_empty() {
            return url.to_string();
        }
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", url, separator, query)
    }
}

/// Percent-encodes parameter lists in a given character set
#[derive(Debug, Clone, Copy)]
pub struct ParamEncoder {
    encoding: &'static Encoding,
}

impl ParamEncoder {
    pub fn for_charset(charset: &str) -> Result<Self> {
        Encoding::for_label(charset.as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| {
                WebRequestError::InvalidArgument(format!("Unknown charset: '{}'", charset))
            })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// `application/x-www-form-urlencoded` body, space as `+`
    pub fn form_body(&self, params: &[(String, String)]) -> Result<String> {
        let pairs = params
            .iter()
            .map(|(key, value)| -> Result<String> {
                Ok(format!("{}={}", self.component(key)?, self.component(value)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(pairs.join("&"))
    }

    /// Query string, space as `%20` and `*` as `%2A`
    pub fn query_string(&self, params: &[(String, String)]) -> Result<String> {
        // literal '+' is already %2B at this point, so every '+' left is a space
        Ok(self
            .form_body(params)?
            .replace('+', "%20")
            .replace('*', "%2A"))
    }

    /// Fails instead of falling back to numeric character references or,
    /// for UTF-16 labels, to UTF-8.
    fn component(&self, value: &str) -> Result<String> {
        if self.encoding.output_encoding() != self.encoding {
            return Err(WebRequestError::InvalidArgument(format!(
                "Parameters cannot be encoded as {}",
                self.encoding.name()
            )));
        }
        let (bytes, _, had_errors) = self.encoding.encode(value);
        if had_errors {
            return Err(WebRequestError::InvalidArgument(format!(
                "'{}' cannot be represented in {}",
                value,
                self.encoding.name()
            )));
        }
        Ok(form_urlencoded::byte_serialize(&bytes).collect())
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse `Name: value` headers
    pub fn parse_header(input: &str) -> Result<(String, String)> {
        match input.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(WebRequestError::InvalidArgument(format!(
                "Invalid header format: '{}'. Expected 'key: value'",
                input
            ))),
        }
    }

    /// Parse `key=value` request parameters
    pub fn parse_param(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            None if !input.is_empty() => Ok((input.to_string(), String::new())),
            _ => Err(WebRequestError::InvalidArgument(format!(
                "Invalid parameter format: '{}'. Expected 'key=value'",
                input
            ))),
        }
    }
}
