//! Content classification from the declared content type.

use beacon_core::Error;

use crate::fetch::FetchResponse;

/// What a fetched body can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    /// Text or HTML that can be parsed for further links.
    Text,
    Unusable,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Image => "image",
            ContentKind::Text => "text",
            ContentKind::Unusable => "unusable",
        }
    }
}

/// Classify by case-insensitive substring match on the content type.
pub fn classify(content_type: Option<&str>) -> ContentKind {
    let Some(content_type) = content_type else {
        return ContentKind::Unusable;
    };
    let lowered = content_type.to_ascii_lowercase();

    if lowered.contains("image") {
        ContentKind::Image
    } else if lowered.contains("text") || lowered.contains("html") {
        ContentKind::Text
    } else {
        ContentKind::Unusable
    }
}

impl FetchResponse {
    pub fn kind(&self) -> ContentKind {
        classify(self.content_type.as_deref())
    }

    /// Fail with `ClassificationMismatch` unless the body is of `expected` kind.
    pub fn expect_kind(&self, expected: ContentKind) -> Result<&Self, Error> {
        if self.kind() == expected {
            Ok(self)
        } else {
            Err(Error::ClassificationMismatch {
                expected: expected.as_str().to_string(),
                actual: self.content_type.clone().unwrap_or_else(|| "<none>".to_string()),
            })
        }
    }
}
