/// Errors produced when constructing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
}
