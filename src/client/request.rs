//! Outbound request description and builder.
//!
//! # Responsibilities
//! - Accumulate target, path segments, query parameters, headers,
//!   accepted media types and body
//! - Hold the four outcome handlers, defaulting each to a no-op
//! - Freeze everything into an immutable [`Request`]
//!
//! # Design Decisions
//! - `build` clones the accumulated state; later builder calls never reach
//!   requests that were already built
//! - Handlers are shared (`Arc`), so a request is cheap to clone and can be
//!   reused across calls
//! - Query values and media types are sets; duplicates collapse

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use serde::Serialize;
use url::form_urlencoded;

use crate::client::error::{Failure, HandlerResult};
use crate::client::response::Response;
use crate::http::media_type;

/// Reaction to a classified response.
pub type ResponseHandler = Arc<dyn Fn(&Response) -> HandlerResult + Send + Sync>;

/// Reaction to a transport or decode failure.
pub type FailureHandler = Arc<dyn Fn(Failure<'_>) -> HandlerResult + Send + Sync>;

/// Request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    content_type: String,
    body: Bytes,
}

impl Entity {
    pub fn new(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(media_type::APPLICATION_JSON_UTF_8, body))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(media_type::TEXT_PLAIN_UTF_8, text.into())
    }

    /// Opaque bytes sent as `application/octet-stream`.
    pub fn bytes(body: impl Into<Bytes>) -> Self {
        Self::new(media_type::APPLICATION_OCTET_STREAM, body)
    }

    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k.as_ref(), v.as_ref());
        }
        Self::new(media_type::APPLICATION_FORM_URLENCODED, serializer.finish())
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[derive(Clone)]
struct Handlers {
    on_success: ResponseHandler,
    on_not_found: ResponseHandler,
    on_unsuccessful: ResponseHandler,
    on_failure: FailureHandler,
}

fn ignore_response(_: &Response) -> HandlerResult {
    Ok(())
}

fn ignore_failure(_: Failure<'_>) -> HandlerResult {
    Ok(())
}

impl Default for Handlers {
    fn default() -> Self {
        Self {
            on_success: Arc::new(ignore_response),
            on_not_found: Arc::new(ignore_response),
            on_unsuccessful: Arc::new(ignore_response),
            on_failure: Arc::new(ignore_failure),
        }
    }
}

/// Immutable description of one outbound call.
#[derive(Clone)]
pub struct Request {
    target: String,
    path_segments: Vec<String>,
    query_params: BTreeMap<String, BTreeSet<String>>,
    headers: BTreeMap<String, String>,
    accepted: BTreeSet<String>,
    entity: Option<Entity>,
    handlers: Handlers,
}

impl Request {
    pub fn builder(target: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            state: Request {
                target: target.into(),
                path_segments: Vec::new(),
                query_params: BTreeMap::new(),
                headers: BTreeMap::new(),
                accepted: BTreeSet::new(),
                entity: None,
                handlers: Handlers::default(),
            },
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    pub fn query_params(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.query_params
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn accepted(&self) -> &BTreeSet<String> {
        &self.accepted
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    pub(crate) fn handle_success(&self, response: &Response) -> HandlerResult {
        (self.handlers.on_success)(response)
    }

    pub(crate) fn handle_not_found(&self, response: &Response) -> HandlerResult {
        (self.handlers.on_not_found)(response)
    }

    pub(crate) fn handle_unsuccessful(&self, response: &Response) -> HandlerResult {
        (self.handlers.on_unsuccessful)(response)
    }

    pub(crate) fn handle_failure(&self, failure: Failure<'_>) -> HandlerResult {
        (self.handlers.on_failure)(failure)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("target", &self.target)
            .field("path_segments", &self.path_segments)
            .field("query_params", &self.query_params)
            .field("headers", &self.headers)
            .field("accepted", &self.accepted)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

/// Accumulates the parts of a [`Request`].
#[derive(Clone)]
pub struct RequestBuilder {
    state: Request,
}

impl RequestBuilder {
    /// Append a path segment. Slashes inside `segment` split it further.
    pub fn path(mut self, segment: impl Into<String>) -> Self {
        self.state.path_segments.push(segment.into());
        self
    }

    /// Set a single-valued query parameter, replacing any values for `key`.
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.state
            .query_params
            .insert(key.into(), BTreeSet::from([value.to_string()]));
        self
    }

    /// Merge query parameters; each key given replaces that key's values.
    pub fn query_params<K, I, V>(mut self, params: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for (key, values) in params {
            let values = values.into_iter().map(|v| v.to_string()).collect();
            self.state.query_params.insert(key.into(), values);
        }
        self
    }

    /// Set a header. Names are case-insensitive; a later call replaces an
    /// earlier one whatever its spelling.
    pub fn header(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.state
            .headers
            .insert(name.into().to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.state.accepted.insert(media_type.into());
        self
    }

    pub fn accepting<M: Into<String>>(mut self, media_types: impl IntoIterator<Item = M>) -> Self {
        self.state
            .accepted
            .extend(media_types.into_iter().map(Into::into));
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.state.entity = Some(entity);
        self
    }

    pub fn on_success<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.state.handlers.on_success = Arc::new(handler);
        self
    }

    pub fn on_not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.state.handlers.on_not_found = Arc::new(handler);
        self
    }

    pub fn on_unsuccessful<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.state.handlers.on_unsuccessful = Arc::new(handler);
        self
    }

    pub fn on_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(Failure<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.state.handlers.on_failure = Arc::new(handler);
        self
    }

    /// Snapshot the accumulated state.
    pub fn build(&self) -> Request {
        self.state.clone()
    }
}
