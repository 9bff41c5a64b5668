use std::fmt;
use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body with surrounding whitespace removed; empty for a missing body.
    pub fn trimmed_body(&self) -> &[u8] {
        self.body.trim_ascii()
    }
}

/// An authenticated HTTP capability. Implementations attach credentials; a
/// network failure is an error, any HTTP status is a response.
pub trait Transport {
    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

impl<T: Transport> Transport for &T {
    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse>> + Send {
        (**self).request(method, url, body, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
    }

    #[test]
    fn trimmed_body_strips_whitespace() {
        let resp = HttpResponse::new(200, " \n{}\n");
        assert_eq!(resp.trimmed_body(), b"{}");
        assert!(HttpResponse::new(200, "").trimmed_body().is_empty());
    }
}
