//! Transport collaborator.
//!
//! # Responsibilities
//! - Perform one round-trip for an [`Invocation`]
//! - Hand back a [`Response`] that owns the live body
//!
//! # Design Decisions
//! - Connection reuse, TLS and socket timeouts belong to the transport;
//!   the dispatcher above it never retries
//! - Timeouts surface as errors whose chain `TransportError::is_timeout`
//!   recognises

use std::time::Duration;

use async_trait::async_trait;

use crate::client::error::TransportError;
use crate::client::invocation::Invocation;
use crate::client::response::{ReqwestBody, Response};
use crate::config::ClientConfig;

/// Executes invocations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, invocation: Invocation) -> Result<Response, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(TransportError::new)?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, invocation: Invocation) -> Result<Response, TransportError> {
        let Invocation {
            method,
            url,
            headers,
            body,
        } = invocation;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(entity) = body {
            builder = builder.body(entity.body().clone());
        }

        let response = builder.send().await.map_err(TransportError::new)?;
        let status = response.status();
        let headers = response.headers().clone();
        Ok(Response::new(status, headers, ReqwestBody::new(response)))
    }
}
