use serde::{Deserialize, Serialize};

use ember_types::ContentAddress;

use crate::error::ValidationError;

/// Maximum number of image payloads a post may carry.
pub const MAX_IMAGES: usize = 4;

/// One image attached to a post.
///
/// Images travel on the wire as plain strings: either an inline `data:` URL
/// produced by the (out-of-scope) client-side resizer, or a content address
/// of a separately stored blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImagePayload {
    /// Base64 data URL, embedded directly in the content blob.
    Inline(String),
    /// Content address of an image stored on the network in its own right.
    Addressed(ContentAddress),
}

impl TryFrom<String> for ImagePayload {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.starts_with("data:") {
            Ok(Self::Inline(raw))
        } else {
            let addr = ContentAddress::new(raw)
                .map_err(|e| ValidationError::InvalidImage(e.to_string()))?;
            Ok(Self::Addressed(addr))
        }
    }
}

impl From<ImagePayload> for String {
    fn from(payload: ImagePayload) -> Self {
        match payload {
            ImagePayload::Inline(data_url) => data_url,
            ImagePayload::Addressed(addr) => addr.as_str().to_string(),
        }
    }
}

/// Immutable post content as stored on the network.
///
/// Wire shape: `{title: string, content: string, images?: string[]}`.
/// The `images` field is omitted entirely when empty, matching what existing
/// readers of the format expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImagePayload>,
}

impl PostContent {
    /// Parse content bytes fetched from the storage network.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_image_roundtrips() {
        let json = "\"data:image/jpeg;base64,AAAA\"";
        let img: ImagePayload = serde_json::from_str(json).unwrap();
        assert!(matches!(img, ImagePayload::Inline(_)));
        assert_eq!(serde_json::to_string(&img).unwrap(), json);
    }

    #[test]
    fn addressed_image_roundtrips() {
        let json = "\"q9yE3mJQpNw5xLrW\"";
        let img: ImagePayload = serde_json::from_str(json).unwrap();
        assert!(matches!(img, ImagePayload::Addressed(_)));
        assert_eq!(serde_json::to_string(&img).unwrap(), json);
    }

    #[test]
    fn empty_image_string_rejected() {
        let result: Result<ImagePayload, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn images_field_omitted_when_empty() {
        let content = PostContent {
            title: "t".into(),
            content: "c".into(),
            images: vec![],
        };
        let json = serde_json::to_string(&content).unwrap();
        assert!(!json.contains("images"));
    }

    #[test]
    fn missing_images_field_parses_as_empty() {
        let content = PostContent::from_bytes(br#"{"title":"t","content":"c"}"#).unwrap();
        assert!(content.images.is_empty());
    }
}
