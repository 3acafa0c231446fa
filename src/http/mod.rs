//! HTTP client module
//!
//! This module turns a prepared request into a reqwest call and the response
//! into text.

use crate::config::{HttpMethod, RequestConfig};
use crate::error::{Result, WebRequestError};
use reqwest::{Client, ClientBuilder, Method};

pub mod auth;
pub mod request;
pub mod response;

use request::PreparedRequest;
use response::{buffer_capacity, ResponseDecoder};

/// HTTP client wrapper
pub struct HttpClient {
    client: Client,
    decoder: ResponseDecoder,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: &RequestConfig) -> Result<Self> {
        // Decompression is done by ResponseDecoder, which needs the raw
        // Content-Encoding header.
        let mut builder = ClientBuilder::new().no_gzip().no_brotli().no_deflate();

        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }

        let client = builder.build().map_err(WebRequestError::Http)?;
        let decoder = ResponseDecoder::new(&config.charset)?;

        Ok(Self { client, decoder })
    }

    /// Execute a prepared request and decode the response body
    pub async fn execute(&self, prepared: &PreparedRequest) -> Result<String> {
        let method = match prepared.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut request = self.client.request(method, &prepared.url);
        for (key, value) in &prepared.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &prepared.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(classify)?;
        log::debug!(
            "{} {} -> {}",
            prepared.method,
            prepared.url,
            response.status()
        );

        // Refuse oversized bodies before reading any of them.
        let capacity = buffer_capacity(response.content_length())?;
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        self.decoder.decode(&headers, capacity, &body)
    }
}

fn classify(err: reqwest::Error) -> WebRequestError {
    if err.is_timeout() {
        WebRequestError::Timeout
    } else {
        WebRequestError::Http(err)
    }
}
