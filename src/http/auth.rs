//! HTTP authentication utilities

use crate::error::{Result, WebRequestError};
use base64::Engine;

/// Authentication helper
pub struct Auth;

impl Auth {
    /// Create basic auth header value
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// Parse user:password format
    pub fn parse_user_pass(input: &str) -> Result<(String, String)> {
        if input.is_empty() {
            return Err(WebRequestError::InvalidArgument(
                "Invalid user:password format".to_string(),
            ));
        }
        match input.split_once(':') {
            Some((user, pass)) => Ok((user.to_string(), pass.to_string())),
            None => Ok((input.to_string(), String::new())),
        }
    }
}
