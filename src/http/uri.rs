//! URI component encoding.

use url::form_urlencoded;

/// Form-url-encode `input`, writing spaces as `%20` instead of `+`.
///
/// A literal `+` in the input is already escaped as `%2B` by the
/// serializer, so replacing `+` afterwards only touches spaces.
pub fn encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Decode a form-url-encoded component (`%XX` escapes, `+` as space).
pub fn decode(input: &str) -> String {
    // `parse` splits on `&` and `=`; escape both so the input stays one key.
    let escaped = input.replace('&', "%26").replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}
