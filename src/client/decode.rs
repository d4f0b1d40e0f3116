//! Entity decoding.
//!
//! A decoder turns a fully read body into any `T: DeserializeOwned`, which
//! covers plain types as well as parameterised shapes like `Vec<Item>`.

use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;

use crate::client::error::DecodeError;
use crate::http::media_type;

/// Converts response bodies into typed entities.
pub trait EntityDecoder: Send + Sync {
    fn decode<T: DeserializeOwned>(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<T, DecodeError>;
}

/// Decodes JSON bodies with `serde_json`.
///
/// The body is parsed as JSON whatever its `Content-Type`; a non-JSON type
/// is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl EntityDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<T, DecodeError> {
        match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            Some(content_type) if !media_type::is_json(content_type) => {
                tracing::debug!(content_type, len = body.len(), "Decoding non-JSON entity as JSON");
            }
            content_type => {
                tracing::trace!(content_type, len = body.len(), "Decoding response entity");
            }
        }
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_decodes_simple_and_generic_shapes() {
        let headers = HeaderMap::new();
        let item: Item = JsonDecoder.decode(&headers, br#"{"id":1}"#).unwrap();
        assert_eq!(item, Item { id: 1 });

        let items: Vec<Item> = JsonDecoder.decode(&headers, br#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(items.len(), 2);

        let map: HashMap<String, Item> =
            JsonDecoder.decode(&headers, br#"{"a":{"id":3}}"#).unwrap();
        assert_eq!(map["a"], Item { id: 3 });
    }

    #[test]
    fn test_mislabelled_json_still_decodes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        let item: Item = JsonDecoder.decode(&headers, br#"{"id":4}"#).unwrap();
        assert_eq!(item, Item { id: 4 });
    }

    #[test]
    fn test_mismatch_is_decode_error() {
        let result: Result<Item, _> = JsonDecoder.decode(&HeaderMap::new(), b"not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }
}
