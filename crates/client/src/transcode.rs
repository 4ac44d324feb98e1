//! Body transcoding into portable representations.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type used when the server declared none.
const FALLBACK_MIME: &str = "image/x-icon";

/// Encode image bytes as a `data:` URI, keeping the declared MIME essence.
pub fn to_inline_image(content_type: Option<&str>, bytes: &[u8]) -> String {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MIME);

    format!("data:{};base64,{}", mime.to_ascii_lowercase(), STANDARD.encode(bytes))
}

/// Decode a text body, replacing invalid UTF-8 sequences.
pub fn to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
