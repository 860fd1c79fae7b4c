use crate::content::{ImagePayload, PostContent, MAX_IMAGES};
use crate::error::ValidationError;

/// Maximum title length in Unicode code points.
pub const MAX_TITLE_CODE_POINTS: usize = 200;

/// User-authored post input, prior to validation.
#[derive(Clone, Debug, Default)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub images: Vec<ImagePayload>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<ImagePayload>) -> Self {
        self.images = images;
        self
    }

    /// Validate the draft and produce the immutable wire-shape content.
    ///
    /// Title and body are trimmed; a draft whose title or body is empty after
    /// trimming is rejected, as is a title longer than
    /// [`MAX_TITLE_CODE_POINTS`] code points or more than [`MAX_IMAGES`]
    /// images.
    pub fn validate(&self) -> Result<PostContent, ValidationError> {
        let title = self.title.trim();
        let body = self.body.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_CODE_POINTS {
            return Err(ValidationError::TitleTooLong {
                length: title_len,
                max: MAX_TITLE_CODE_POINTS,
            });
        }
        if self.images.len() > MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                count: self.images.len(),
                max: MAX_IMAGES,
            });
        }

        Ok(PostContent {
            title: title.to_string(),
            content: body.to_string(),
            images: self.images.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(n: usize) -> Vec<ImagePayload> {
        (0..n)
            .map(|i| ImagePayload::Inline(format!("data:image/jpeg;base64,{i}")))
            .collect()
    }

    #[test]
    fn valid_draft_passes() {
        let content = PostDraft::new("Acme Corp Overcharges", "They did it again.")
            .validate()
            .unwrap();
        assert_eq!(content.title, "Acme Corp Overcharges");
        assert_eq!(content.content, "They did it again.");
    }

    #[test]
    fn title_and_body_are_trimmed() {
        let content = PostDraft::new("  padded  ", "\n\tbody\n").validate().unwrap();
        assert_eq!(content.title, "padded");
        assert_eq!(content.content, "body");
    }

    #[test]
    fn whitespace_only_title_rejected() {
        let err = PostDraft::new("   ", "body").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn whitespace_only_body_rejected() {
        let err = PostDraft::new("title", " \n ").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyBody);
    }

    #[test]
    fn title_cap_counts_code_points_not_bytes() {
        // 200 multibyte code points is exactly at the cap.
        let title: String = "é".repeat(MAX_TITLE_CODE_POINTS);
        assert!(PostDraft::new(title, "body").validate().is_ok());

        let over: String = "é".repeat(MAX_TITLE_CODE_POINTS + 1);
        let err = PostDraft::new(over, "body").validate().unwrap_err();
        assert!(matches!(err, ValidationError::TitleTooLong { length: 201, .. }));
    }

    #[test]
    fn four_images_allowed_five_rejected() {
        let draft = PostDraft::new("t", "b").with_images(inline(MAX_IMAGES));
        assert!(draft.validate().is_ok());

        let draft = PostDraft::new("t", "b").with_images(inline(MAX_IMAGES + 1));
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ValidationError::TooManyImages { count: 5, .. }));
    }

    #[test]
    fn validation_is_pure() {
        let draft = PostDraft::new(" t ", " b ");
        let first = draft.validate().unwrap();
        let second = draft.validate().unwrap();
        assert_eq!(first, second);
        // The draft itself is untouched.
        assert_eq!(draft.title, " t ");
    }
}
