//! Fluent request construction

use crate::config::{HttpMethod, RequestConfig};
use crate::error::{Result, WebRequestError};
use crate::http::auth::Auth;
use crate::http::HttpClient;
use crate::utils::{ParamEncoder, UrlUtils};
use reqwest::header::{HeaderName, HeaderValue};
use std::fmt::Display;
use std::thread::JoinHandle;

/// Fluent builder for a single GET/POST request.
///
/// Every setter consumes the builder and hands it back, and every way of
/// executing it consumes it for good, so a request is configured once and
/// sent once.
///
/// ```no_run
/// use webrequest::RequestBuilder;
///
/// # fn main() -> webrequest::Result<()> {
/// let body = RequestBuilder::new()
///     .get()
///     .target_url("http://example.com/api")?
///     .add_param("q", "a b")?
///     .add_param("n", 1)?
///     .with_gzip(true)
///     .execute_sync()?;
/// # let _ = body;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.config.method = Some(method);
        self
    }

    pub fn get(self) -> Self {
        self.method(HttpMethod::Get)
    }

    pub fn post(self) -> Self {
        self.method(HttpMethod::Post)
    }

    pub fn put(self) -> Self {
        self.method(HttpMethod::Put)
    }

    pub fn delete(self) -> Self {
        self.method(HttpMethod::Delete)
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(WebRequestError::InvalidArgument(
                "You must provide a valid target URL".to_string(),
            ));
        }
        self.config.url = Some(url);
        Ok(self)
    }

    /// Credentials are sent only when both are given; no format checks.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        HeaderValue::from_str(&user_agent).map_err(|_| {
            WebRequestError::InvalidArgument(format!("Invalid User-Agent header: '{}'", user_agent))
        })?;
        self.config.user_agent = user_agent;
        Ok(self)
    }

    /// Both values are in milliseconds; zero disables the timeout.
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.config.connection_timeout_ms = connect_ms;
        self.config.socket_timeout_ms = read_ms;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Result<Self> {
        let charset = charset.into();
        ParamEncoder::for_charset(&charset)?;
        self.config.charset = charset;
        Ok(self)
    }

    pub fn with_gzip(mut self, enabled: bool) -> Self {
        self.config.gzip = enabled;
        self
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let (name, value) = (name.into(), value.into());
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            WebRequestError::InvalidArgument(format!("Invalid header name: '{}'", name))
        })?;
        HeaderValue::from_str(&value).map_err(|_| {
            WebRequestError::InvalidArgument(format!("Invalid value for header '{}'", name))
        })?;
        self.config.headers.push((name, value));
        Ok(self)
    }

    /// Append a parameter; numbers are stored in their `Display` form.
    pub fn add_param(mut self, key: impl Into<String>, value: impl Display) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(WebRequestError::InvalidArgument(
                "You must pass a valid key when adding a param".to_string(),
            ));
        }
        self.config.params.push((key, value.to_string()));
        Ok(self)
    }

    /// Validate the configuration and freeze it into a request
    pub fn prepare(&self) -> Result<PreparedRequest> {
        let method = self.config.method.ok_or_else(|| {
            WebRequestError::InvalidState(
                "You must select GET, POST, PUT or DELETE before executing the request"
                    .to_string(),
            )
        })?;
        let url = match self.config.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(WebRequestError::InvalidState(
                    "You must provide a valid target URL before executing the request".to_string(),
                ))
            }
        };

        let encoder = ParamEncoder::for_charset(&self.config.charset)?;
        let (url, body) = match method {
            HttpMethod::Get => (
                UrlUtils::append_query(url, &encoder.query_string(&self.config.params)?),
                None,
            ),
            HttpMethod::Post => {
                let body = if self.config.params.is_empty() {
                    None
                } else {
                    Some(encoder.form_body(&self.config.params)?)
                };
                (url.to_string(), body)
            }
            HttpMethod::Put | HttpMethod::Delete => {
                return Err(WebRequestError::UnsupportedMethod(method))
            }
        };

        // Built-in headers replace custom ones of the same name.
        let mut headers = self.config.headers.clone();
        set_header(&mut headers, "User-Agent", self.config.user_agent.clone());
        if let Some((username, password)) = self.config.credentials() {
            set_header(&mut headers, "Authorization", Auth::basic_auth(username, password));
        }
        if self.config.gzip {
            set_header(&mut headers, "Accept-Encoding", "gzip".to_string());
        }
        if body.is_some() {
            set_header(
                &mut headers,
                "Content-Type",
                format!(
                    "application/x-www-form-urlencoded; charset={}",
                    self.config.charset
                ),
            );
        }

        log::debug!("prepared {} {}", method, url);
        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            config: self.config.clone(),
        })
    }

    /// Send the request, keeping the reason for any failure
    pub async fn send(self) -> Result<String> {
        let prepared = self.prepare()?;
        HttpClient::new(&prepared.config)?.execute(&prepared).await
    }

    /// Blocking form of [`RequestBuilder::send`]; must not be called from async code
    pub fn send_blocking(self) -> Result<String> {
        let prepared = self.prepare()?;
        prepared.send_blocking()
    }

    /// Send and wait for the body.
    ///
    /// Preparation errors are returned as `Err`. Anything that goes wrong on
    /// the wire or while decoding yields `Ok(None)`.
    pub fn execute_sync(self) -> Result<Option<String>> {
        let prepared = self.prepare()?;
        Ok(collapse(prepared.send_blocking()))
    }

    /// Send on a background thread and report through the callbacks.
    ///
    /// The request is prepared before this returns, so configuration errors
    /// come back here instead of through `on_error`. The returned handle may
    /// be dropped.
    pub fn execute_async<S, E>(self, on_success: S, on_error: E) -> Result<JoinHandle<()>>
    where
        S: FnOnce(String) + Send + 'static,
        E: FnOnce(WebRequestError) + Send + 'static,
    {
        let prepared = self.prepare()?;
        let handle = std::thread::Builder::new()
            .name("webrequest".to_string())
            .spawn(move || match prepared.send_blocking() {
                Ok(body) => on_success(body),
                Err(err) => {
                    log::warn!("{} {} failed: {}", prepared.method, prepared.url, err);
                    on_error(err)
                }
            })?;
        Ok(handle)
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value));
}

fn collapse(outcome: Result<String>) -> Option<String> {
    match outcome {
        Ok(body) => Some(body),
        Err(err) => {
            log::warn!("request failed: {}", err);
            None
        }
    }
}

/// A validated request, ready to be sent
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// Final URL, query string included for GET.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    config: RequestConfig,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn charset(&self) -> &str {
        &self.config.charset
    }

    fn send_blocking(&self) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async {
            let client = HttpClient::new(&self.config)?;
            client.execute(self).await
        })
    }
}
