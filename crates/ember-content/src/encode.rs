use crate::content::PostContent;
use crate::draft::PostDraft;
use crate::error::ValidationError;

/// Validated content together with its canonical byte encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalPost {
    pub content: PostContent,
    pub bytes: Vec<u8>,
}

impl CanonicalPost {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Validate a draft and encode it into deterministic canonical bytes.
///
/// The encoding is JSON with the struct's fixed field order and no
/// insignificant whitespace, so encoding the same draft twice yields
/// byte-identical output. Pure: no I/O, no clock, no randomness.
pub fn encode(draft: &PostDraft) -> Result<CanonicalPost, ValidationError> {
    let content = draft.validate()?;
    let bytes = serde_json::to_vec(&content)
        .map_err(|e| ValidationError::Encoding(e.to_string()))?;
    Ok(CanonicalPost { content, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ImagePayload;
    use proptest::prelude::*;

    #[test]
    fn encoding_is_deterministic() {
        let draft = PostDraft::new("Acme Corp Overcharges", "Billing details inside.")
            .with_images(vec![ImagePayload::Inline("data:image/jpeg;base64,AA".into())]);
        let first = encode(&draft).unwrap();
        let second = encode(&draft).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn encoded_bytes_parse_back_to_the_same_content() {
        let draft = PostDraft::new("title", "body");
        let canonical = encode(&draft).unwrap();
        let parsed = PostContent::from_bytes(&canonical.bytes).unwrap();
        assert_eq!(parsed, canonical.content);
    }

    #[test]
    fn field_order_is_title_content_images() {
        let draft = PostDraft::new("t", "b")
            .with_images(vec![ImagePayload::Inline("data:x".into())]);
        let canonical = encode(&draft).unwrap();
        let text = String::from_utf8(canonical.bytes).unwrap();
        let title_at = text.find("\"title\"").unwrap();
        let content_at = text.find("\"content\"").unwrap();
        let images_at = text.find("\"images\"").unwrap();
        assert!(title_at < content_at && content_at < images_at);
    }

    #[test]
    fn invalid_draft_does_not_encode() {
        assert!(encode(&PostDraft::new("", "body")).is_err());
    }

    proptest! {
        #[test]
        fn determinism_holds_for_arbitrary_text(title in "\\PC{1,80}", body in "\\PC{1,400}") {
            let draft = PostDraft::new(title, body);
            match (encode(&draft), encode(&draft)) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a.bytes, b.bytes),
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                _ => prop_assert!(false, "validation disagreed with itself"),
            }
        }

        #[test]
        fn encoded_output_always_reparses(title in "[a-zA-Z0-9 ]{1,40}", body in "[a-zA-Z0-9 ]{1,200}") {
            // Alphanumeric input survives trimming, so encoding must succeed.
            prop_assume!(!title.trim().is_empty() && !body.trim().is_empty());
            let canonical = encode(&PostDraft::new(title, body)).unwrap();
            let parsed = PostContent::from_bytes(&canonical.bytes).unwrap();
            prop_assert_eq!(parsed, canonical.content);
        }
    }
}
