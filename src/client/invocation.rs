//! Wire invocation built from a [`Request`].

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::client::error::ClientError;
use crate::client::request::{Entity, Request};

/// Everything a transport needs to perform one round-trip.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Entity>,
}

impl Invocation {
    /// Build the invocation for `request` sent with `method`.
    ///
    /// Path segments are appended in order, each query value becomes its own
    /// `key=value` pair, accepted media types form the `Accept` header and
    /// custom headers are inserted last. Only methods that carry a body
    /// (POST, PUT, PATCH) get the request entity.
    pub fn build(request: &Request, method: Method) -> Result<Self, ClientError> {
        let target = request.target();
        let mut url = Url::parse(target)
            .map_err(|e| ClientError::InvalidRequest(format!("target '{}': {}", target, e)))?;

        if !request.path_segments().is_empty() {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!("target '{}' cannot take a path", target))
            })?;
            segments.pop_if_empty();
            for segment in request.path_segments() {
                segments.extend(segment.split('/').filter(|s| !s.is_empty()));
            }
        }

        if !request.query_params().is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, values) in request.query_params() {
                for value in values {
                    query.append_pair(key, value);
                }
            }
        }

        let body = if carries_body(&method) {
            request.entity().cloned()
        } else {
            None
        };

        let mut headers = HeaderMap::new();
        if !request.accepted().is_empty() {
            let accept = request
                .accepted()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(header::ACCEPT, header_value(&accept)?);
        }
        if let Some(entity) = &body {
            headers.insert(header::CONTENT_TYPE, header_value(entity.content_type())?);
        }
        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidRequest(format!("header name '{}': {}", name, e))
            })?;
            headers.insert(name, header_value(value)?);
        }

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Whether requests with this method send an entity.
pub fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::InvalidRequest(format!("header value '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::media_type::{APPLICATION_JSON, APPLICATION_PDF};

    fn request() -> Request {
        Request::builder("http://api.local/v1/")
            .path("users")
            .path("a b/42")
            .query_params([("tag", vec!["x", "y"])])
            .query_param("q", "hello world")
            .accepting([APPLICATION_PDF, APPLICATION_JSON])
            .header("X-Trace", "abc")
            .entity(Entity::text("body"))
            .build()
    }

    #[test]
    fn test_url_and_headers() {
        let invocation = Invocation::build(&request(), Method::POST).unwrap();

        assert_eq!(
            invocation.url.as_str(),
            "http://api.local/v1/users/a%20b/42?q=hello+world&tag=x&tag=y"
        );
        assert_eq!(invocation.headers[header::ACCEPT], "application/json, application/pdf");
        assert_eq!(invocation.headers["x-trace"], "abc");
        assert_eq!(
            invocation.headers[header::CONTENT_TYPE],
            crate::http::media_type::TEXT_PLAIN_UTF_8
        );
        assert_eq!(invocation.body.unwrap().body().as_ref(), b"body");
    }

    #[test]
    fn test_bodyless_methods_never_attach_entity() {
        for method in [Method::GET, Method::DELETE] {
            let invocation = Invocation::build(&request(), method).unwrap();
            assert!(invocation.body.is_none());
            assert!(invocation.headers.get(header::CONTENT_TYPE).is_none());
        }
        assert!(Invocation::build(&request(), Method::PUT).unwrap().body.is_some());
    }

    #[test]
    fn test_custom_header_overrides_content_type() {
        let request = Request::builder("http://api.local")
            .entity(Entity::text("x"))
            .header("content-type", "text/csv")
            .build();
        let invocation = Invocation::build(&request, Method::PUT).unwrap();
        assert_eq!(invocation.headers[header::CONTENT_TYPE], "text/csv");
    }

    #[test]
    fn test_invalid_target_and_header() {
        let bad_target = Request::builder("not a url").build();
        assert!(matches!(
            Invocation::build(&bad_target, Method::GET),
            Err(ClientError::InvalidRequest(_))
        ));

        let bad_header = Request::builder("http://api.local").header("bad header", "v").build();
        assert!(matches!(
            Invocation::build(&bad_header, Method::GET),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_later_header_wins_regardless_of_case() {
        let request = Request::builder("http://api.local")
            .header("x-mode", "first")
            .header("X-Mode", "second")
            .headers([("X-MODE", "third"), ("x-other", "1")])
            .header("X-Other", "2")
            .build();
        let invocation = Invocation::build(&request, Method::GET).unwrap();

        let modes: Vec<_> = invocation.headers.get_all("x-mode").iter().collect();
        assert_eq!(modes, ["third"]);
        assert_eq!(invocation.headers["x-other"], "2");
    }

    #[test]
    fn test_no_query_string_without_params() {
        let request = Request::builder("http://api.local").path("ping").build();
        let invocation = Invocation::build(&request, Method::GET).unwrap();
        assert_eq!(invocation.url.as_str(), "http://api.local/ping");
    }
}
