//! Configuration management for webrequest

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Android";
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 6000;
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 8000;
pub const DEFAULT_CHARSET: &str = "utf-8";

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

/// Everything a request needs before it is prepared
#[derive(Clone)]
pub struct RequestConfig {
    pub method: Option<HttpMethod>,
    pub url: Option<String>,
    pub user_agent: String,
    /// Zero disables the timeout.
    pub connection_timeout_ms: u64,
    /// Zero disables the timeout.
    pub socket_timeout_ms: u64,
    pub charset: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub gzip: bool,
}

impl RequestConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connection_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.socket_timeout_ms)
    }

    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn millis(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_millis(value))
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig {
            method: None,
            url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            charset: DEFAULT_CHARSET.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            username: None,
            password: None,
            gzip: false,
        }
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("user_agent", &self.user_agent)
            .field("connection_timeout_ms", &self.connection_timeout_ms)
            .field("socket_timeout_ms", &self.socket_timeout_ms)
            .field("charset", &self.charset)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("gzip", &self.gzip)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpMethod, RequestConfig};
    use std::time::Duration;

    #[test]
    fn defaults_match_documented_values() {
        let config = RequestConfig::default();
        assert_eq!(config.method, None);
        assert_eq!(config.user_agent, "Android");
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(6000)));
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(8000)));
        assert_eq!(config.charset, "utf-8");
        assert!(!config.gzip);
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let config = RequestConfig {
            connection_timeout_ms: 0,
            ..RequestConfig::default()
        };
        assert_eq!(config.connect_timeout(), None);
    }

    #[test]
    fn credentials_require_both_parts() {
        let mut config = RequestConfig {
            username: Some("user".to_string()),
            ..RequestConfig::default()
        };
        assert_eq!(config.credentials(), None);
        config.password = Some("pass".to_string());
        assert_eq!(config.credentials(), Some(("user", "pass")));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = RequestConfig {
            password: Some("hunter2".to_string()),
            ..RequestConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("post".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert_eq!("Delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("PATCH".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
