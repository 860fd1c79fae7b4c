/// Rejections of locally-authored input. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("body must not be empty")]
    EmptyBody,

    #[error("title is {length} code points; the maximum is {max}")]
    TitleTooLong { length: usize, max: usize },

    #[error("a post carries at most {max} images, got {count}")]
    TooManyImages { count: usize, max: usize },

    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    #[error("content failed to encode: {0}")]
    Encoding(String),
}
