//! Outcome-dispatching REST client.
//!
//! # Flow per call
//! ```text
//! Request + method
//!     → Invocation::build (target, path, query, Accept, headers, body)
//!     → Transport::execute
//!         Ok(response)  → classify once:
//!                           2xx  → on_success
//!                           404  → on_not_found, then on_unsuccessful
//!                           else → on_unsuccessful
//!         Err(timeout)  → on_failure, synthetic 408 response
//!         Err(other)    → on_failure, Outcome::Failed
//!     → typed forms only: read + decode under a release guard,
//!       on_failure on decode error
//! ```
//!
//! # Design Decisions
//! - A handler error aborts the call and is returned as
//!   `ClientError::Handler` unchanged; it is never routed to another handler
//! - `on_failure` only sees transport and decode failures
//! - The synthetic 408 is not classified, so no response handler fires for it

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::decode::{EntityDecoder, JsonDecoder};
use crate::client::error::{ClientError, DecodeError, Failure, TransportError};
use crate::client::invocation::Invocation;
use crate::client::request::Request;
use crate::client::response::Response;
use crate::client::transport::{ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::http::status;
use crate::observability::metrics;

/// Result of one round-trip attempt.
#[derive(Debug)]
pub enum Outcome {
    /// A response was obtained (possibly the synthetic 408 for a timeout).
    Response(Response),
    /// The transport failed without producing a response.
    Failed(TransportError),
}

/// HTTP client that routes each outcome to the request's handlers.
///
/// Stateless apart from the shared transport and decoder; clones are cheap
/// and calls may run concurrently.
pub struct RestClient<T = ReqwestTransport, D = JsonDecoder> {
    transport: Arc<T>,
    decoder: Arc<D>,
}

impl<T, D> Clone for RestClient<T, D> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl RestClient {
    /// Client over a `reqwest` transport configured from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::with_transport(ReqwestTransport::new(config)?, JsonDecoder))
    }
}

impl<T: Transport, D: EntityDecoder> RestClient<T, D> {
    pub fn with_transport(transport: T, decoder: D) -> Self {
        Self {
            transport: Arc::new(transport),
            decoder: Arc::new(decoder),
        }
    }

    pub async fn get(&self, request: &Request) -> Result<Response, ClientError> {
        self.execute(Method::GET, request).await
    }

    pub async fn get_entity<E: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Option<E>, ClientError> {
        self.execute_entity(Method::GET, request).await
    }

    pub async fn post(&self, request: &Request) -> Result<Response, ClientError> {
        self.execute(Method::POST, request).await
    }

    pub async fn post_entity<E: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Option<E>, ClientError> {
        self.execute_entity(Method::POST, request).await
    }

    pub async fn put(&self, request: &Request) -> Result<Response, ClientError> {
        self.execute(Method::PUT, request).await
    }

    pub async fn put_entity<E: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Option<E>, ClientError> {
        self.execute_entity(Method::PUT, request).await
    }

    pub async fn delete(&self, request: &Request) -> Result<Response, ClientError> {
        self.execute(Method::DELETE, request).await
    }

    pub async fn delete_entity<E: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Option<E>, ClientError> {
        self.execute_entity(Method::DELETE, request).await
    }

    /// Perform the call and return the response.
    ///
    /// A non-timeout transport failure becomes [`ClientError::NoResponse`]
    /// after `on_failure` has run.
    pub async fn execute(
        &self,
        method: Method,
        request: &Request,
    ) -> Result<Response, ClientError> {
        match self.invoke(method, request).await? {
            Outcome::Response(response) => Ok(response),
            Outcome::Failed(error) => Err(ClientError::NoResponse(error)),
        }
    }

    /// Perform the call and decode the body into `E`.
    ///
    /// `Ok(None)` when no response was obtained or decoding failed; in both
    /// cases `on_failure` has already run.
    pub async fn execute_entity<E: DeserializeOwned>(
        &self,
        method: Method,
        request: &Request,
    ) -> Result<Option<E>, ClientError> {
        match self.invoke(method.clone(), request).await? {
            Outcome::Response(response) => self.read_entity(&method, request, response).await,
            Outcome::Failed(_) => Ok(None),
        }
    }

    /// Perform the round-trip and dispatch exactly one classification.
    pub async fn invoke(&self, method: Method, request: &Request) -> Result<Outcome, ClientError> {
        let invocation = Invocation::build(request, method.clone())?;
        tracing::debug!(method = %method, url = %invocation.url, "Dispatching request");

        match self.transport.execute(invocation).await {
            Ok(response) => {
                classify(&method, request, &response)?;
                Ok(Outcome::Response(response))
            }
            Err(error) => {
                let timed_out = error.is_timeout();
                tracing::warn!(method = %method, error = %error, timed_out, "Transport failure");
                let class = if timed_out { "timeout" } else { "transport_failure" };
                metrics::record_client_outcome(&method, class);

                request
                    .handle_failure(Failure::Transport(&error))
                    .map_err(handler_failed)?;

                if timed_out {
                    Ok(Outcome::Response(Response::empty(StatusCode::REQUEST_TIMEOUT)))
                } else {
                    Ok(Outcome::Failed(error))
                }
            }
        }
    }

    async fn read_entity<E: DeserializeOwned>(
        &self,
        method: &Method,
        request: &Request,
        mut response: Response,
    ) -> Result<Option<E>, ClientError> {
        let decoded: Result<E, DecodeError> = {
            let mut guard = response.release_guard();
            match guard.bytes().await {
                Ok(body) => self.decoder.decode(guard.headers(), &body),
                Err(e) => Err(DecodeError::Body(e)),
            }
        };

        match decoded {
            Ok(entity) => Ok(Some(entity)),
            Err(error) => {
                tracing::warn!(
                    method = %method,
                    status = %response.status(),
                    error = %error,
                    "Entity decode failure"
                );
                metrics::record_client_outcome(method, "decode_failure");
                request
                    .handle_failure(Failure::Decode(&error))
                    .map_err(handler_failed)?;
                Ok(None)
            }
        }
    }
}

/// Route a response to the matching handlers.
fn classify(method: &Method, request: &Request, response: &Response) -> Result<(), ClientError> {
    let status = response.status();

    if status::is_successful(status.as_u16()) {
        metrics::record_client_outcome(method, "success");
        return request.handle_success(response).map_err(handler_failed);
    }

    tracing::debug!(method = %method, status = %status, "Unsuccessful response");
    if status == StatusCode::NOT_FOUND {
        metrics::record_client_outcome(method, "not_found");
        request.handle_not_found(response).map_err(handler_failed)?;
    } else {
        metrics::record_client_outcome(method, "unsuccessful");
    }
    request.handle_unsuccessful(response).map_err(handler_failed)
}

fn handler_failed(error: crate::client::error::HandlerError) -> ClientError {
    tracing::error!(error = %error, "Outcome handler failed");
    ClientError::Handler(error)
}
