//! Responses and the body resource they own.
//!
//! # Responsibilities
//! - Expose status and headers of a completed round-trip
//! - Own the underlying body resource exclusively
//! - Release that resource exactly once, on every path
//!
//! # Design Decisions
//! - The body sits in an `Option`; `close` takes it out before releasing,
//!   so a second close (or the drop that follows) is a no-op
//! - [`ReleaseGuard`] scopes a read of the body and closes on drop

use std::fmt;
use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode};

use crate::client::error::TransportError;
use crate::http::status::{self, StatusInfo};

/// Transport-owned body of a response.
#[async_trait]
pub trait ResponseBody: Send {
    /// Read the remaining body to the end.
    async fn read_all(&mut self) -> Result<Bytes, TransportError>;

    /// Free the underlying resource. Must tolerate repeated calls.
    fn release(&mut self);
}

/// A body that is already in memory.
#[derive(Debug, Default)]
pub struct BufferedBody {
    bytes: Option<Bytes>,
}

impl BufferedBody {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }
}

#[async_trait]
impl ResponseBody for BufferedBody {
    async fn read_all(&mut self) -> Result<Bytes, TransportError> {
        self.bytes
            .clone()
            .ok_or_else(|| TransportError::new("response body already released"))
    }

    fn release(&mut self) {
        self.bytes = None;
    }
}

/// Outcome of a completed round-trip.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Box<dyn ResponseBody>>,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            headers,
            body: Some(Box::new(body)),
        }
    }

    /// Response with the given status, no headers and an empty body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), BufferedBody::new(Bytes::new()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_info(&self) -> StatusInfo {
        status::from_code(self.status.as_u16())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_successful(&self) -> bool {
        status::is_successful(self.status.as_u16())
    }

    /// Whether the body resource has been released.
    pub fn is_closed(&self) -> bool {
        self.body.is_none()
    }

    /// Read the whole body. Fails once the response is closed.
    pub async fn bytes(&mut self) -> Result<Bytes, TransportError> {
        match self.body.as_mut() {
            Some(body) => body.read_all().await,
            None => Err(TransportError::new("response body already released")),
        }
    }

    /// Release the body resource. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(mut body) = self.body.take() {
            body.release();
        }
    }

    /// Borrow this response under a guard that closes it when dropped.
    pub fn release_guard(&mut self) -> ReleaseGuard<'_> {
        ReleaseGuard { response: self }
    }

    /// Copy into a fully buffered response and release the original.
    ///
    /// Status and body are kept; a header with several values becomes a
    /// single value joined with `;`.
    pub async fn detach(mut self) -> Result<Response, TransportError> {
        let mut guard = self.release_guard();
        let bytes = guard.bytes().await?;

        let mut headers = HeaderMap::new();
        for name in guard.headers().keys() {
            let joined = guard
                .headers()
                .get_all(name)
                .iter()
                .map(HeaderValue::as_bytes)
                .collect::<Vec<_>>()
                .join(&b';');
            // Joining valid values with ';' always yields a valid value.
            if let Ok(value) = HeaderValue::from_bytes(&joined) {
                headers.insert(name.clone(), value);
            }
        }

        Ok(Response::new(guard.status(), headers, BufferedBody::new(bytes)))
    }
}

impl Drop for Response {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Closes the borrowed response when dropped.
pub struct ReleaseGuard<'a> {
    response: &'a mut Response,
}

impl Deref for ReleaseGuard<'_> {
    type Target = Response;

    fn deref(&self) -> &Response {
        self.response
    }
}

impl DerefMut for ReleaseGuard<'_> {
    fn deref_mut(&mut self) -> &mut Response {
        self.response
    }
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.response.close();
    }
}

/// Body backed by a live `reqwest` response.
pub struct ReqwestBody {
    inner: Option<reqwest::Response>,
}

impl ReqwestBody {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            inner: Some(response),
        }
    }
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_all(&mut self) -> Result<Bytes, TransportError> {
        let response = self
            .inner
            .take()
            .ok_or_else(|| TransportError::new("response body already consumed"))?;
        response.bytes().await.map_err(TransportError::new)
    }

    fn release(&mut self) {
        // Dropping the response returns the connection to the pool.
        self.inner.take();
    }
}
