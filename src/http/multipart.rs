//! Multipart form extraction.
//!
//! # Responsibilities
//! - Buffer every part of a `multipart/form-data` payload
//! - Extract a named text part
//! - Extract uploaded files (field `file`) as decoded filename → bytes
//!
//! # Design Decisions
//! - The filename is read from the raw `Content-Disposition` header rather
//!   than multer's parsed value, so percent-encoded names decode uniformly
//! - Parts without a filename under the file field are skipped silently

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::multipart::{Multipart, MultipartError},
    http::{header, HeaderMap},
};

use crate::http::uri;

/// Field key under which uploaded files are expected.
pub const FILE_PART_KEY: &str = "file";

const FILENAME: &str = "filename";

#[derive(Debug, thiserror::Error)]
pub enum MultipartExtractError {
    #[error("failed to read multipart body: {0}")]
    Read(#[from] MultipartError),

    #[error("part '{0}' is not valid UTF-8")]
    NotUtf8(String),
}

/// A single buffered part.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FormPart {
    /// Filename carried by this part's `Content-Disposition`, if any.
    pub fn filename(&self) -> Option<String> {
        self.headers
            .get_all(header::CONTENT_DISPOSITION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.contains(FILENAME))
            .and_then(parse_filename)
    }
}

/// All parts of a multipart payload, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Drain `multipart`, buffering every part.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartExtractError> {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            let headers = field.headers().clone();
            let body = field.bytes().await?;
            parts.push(FormPart { name, headers, body });
        }
        tracing::debug!(parts = parts.len(), "Multipart payload buffered");
        Ok(Self { parts })
    }

    pub fn from_parts(parts: Vec<FormPart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Text content of the first part named `key`.
    pub fn text_part(&self, key: &str) -> Result<Option<String>, MultipartExtractError> {
        let Some(part) = self.parts.iter().find(|p| p.name.as_deref() == Some(key)) else {
            return Ok(None);
        };
        String::from_utf8(part.body.to_vec())
            .map(Some)
            .map_err(|_| MultipartExtractError::NotUtf8(key.to_string()))
    }

    /// Uploaded files under [`FILE_PART_KEY`], keyed by decoded filename.
    ///
    /// A later part with the same filename replaces an earlier one.
    pub fn files(&self) -> BTreeMap<String, Bytes> {
        self.parts
            .iter()
            .filter(|p| p.name.as_deref() == Some(FILE_PART_KEY))
            .filter_map(|p| p.filename().map(|name| (name, p.body.clone())))
            .collect()
    }
}

/// Parse the filename out of a `Content-Disposition` header value.
///
/// Takes everything after the first `filename` token, removes `=` and `"`,
/// then url-decodes the rest. Returns `None` when the token is absent.
pub fn parse_filename(content_disposition: &str) -> Option<String> {
    let (_, after) = content_disposition.split_once(FILENAME)?;
    let stripped: String = after.chars().filter(|c| *c != '=' && *c != '"').collect();
    Some(uri::decode(&stripped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn part(name: &str, disposition: Option<&str>, body: &'static [u8]) -> FormPart {
        let mut headers = HeaderMap::new();
        if let Some(d) = disposition {
            headers.insert(header::CONTENT_DISPOSITION, HeaderValue::from_str(d).unwrap());
        }
        FormPart {
            name: Some(name.to_string()),
            headers,
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_parse_filename() {
        assert_eq!(
            parse_filename(r#"form-data; name="file"; filename="a b.txt""#).as_deref(),
            Some("a b.txt")
        );
        assert_eq!(
            parse_filename(r#"form-data; name="file"; filename="a%20b.txt""#).as_deref(),
            Some("a b.txt")
        );
        assert_eq!(parse_filename(r#"form-data; name="file""#), None);
    }

    #[test]
    fn test_text_part() {
        let form = MultipartForm::from_parts(vec![
            part("title", None, b"hello"),
            part("blob", None, &[0xff, 0xfe]),
        ]);
        assert_eq!(form.text_part("title").unwrap().as_deref(), Some("hello"));
        assert_eq!(form.text_part("missing").unwrap(), None);
        assert!(matches!(
            form.text_part("blob"),
            Err(MultipartExtractError::NotUtf8(_))
        ));
    }

    #[test]
    fn test_files_only_under_file_key() {
        let form = MultipartForm::from_parts(vec![
            part(
                "file",
                Some(r#"form-data; name="file"; filename="r%C3%A9sum%C3%A9.pdf""#),
                b"pdf",
            ),
            part("file", Some(r#"form-data; name="file""#), b"no name"),
            part("other", Some(r#"form-data; name="other"; filename="x.txt""#), b"x"),
        ]);
        let files = form.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files.get("résumé.pdf").map(|b| b.as_ref()), Some(&b"pdf"[..]));
    }
}
