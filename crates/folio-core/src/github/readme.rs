//! README payload decoding.

use base64::Engine;

use super::types::ReadmePayload;

/// Decodes a README payload into text.
///
/// The API wraps base64 at 60 columns, so whitespace is stripped before
/// decoding. Invalid UTF-8 is replaced rather than rejected. Returns `None`
/// for any other encoding or for content that is not valid base64.
pub fn decode_readme(payload: &ReadmePayload) -> Option<String> {
    let encoding = payload.encoding.as_deref()?;
    if !encoding.eq_ignore_ascii_case("base64") {
        tracing::debug!(encoding, "unsupported README encoding");
        return None;
    }
    let compact: String = payload
        .content
        .as_deref()?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    match base64::engine::general_purpose::STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("README content is not valid base64: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(content: Option<&str>, encoding: Option<&str>) -> ReadmePayload {
        ReadmePayload {
            content: content.map(str::to_string),
            encoding: encoding.map(str::to_string),
        }
    }

    #[test]
    fn decodes_wrapped_base64() {
        let p = payload(Some("aGVs\nbG8=\n"), Some("base64"));
        assert_eq!(decode_readme(&p).as_deref(), Some("hello"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        // 0xff is never valid UTF-8.
        let p = payload(Some("/w=="), Some("base64"));
        assert_eq!(decode_readme(&p).as_deref(), Some("\u{fffd}"));
    }

    #[test]
    fn other_encodings_and_garbage_are_none() {
        assert!(decode_readme(&payload(Some("plain"), Some("utf-8"))).is_none());
        assert!(decode_readme(&payload(Some("@@@"), Some("base64"))).is_none());
        assert!(decode_readme(&payload(None, Some("base64"))).is_none());
        assert!(decode_readme(&payload(Some("aGk="), None)).is_none());
    }
}
