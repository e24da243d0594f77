use std::borrow::Cow;

pub type Result<T, E = LedgerStoreError> = core::result::Result<T, E>;

/// Errors that can occur when building a ledger snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    /// The entity id is the sentinel missing id, which can never name a stored entity.
    #[error("invalid id error: {0}")]
    InvalidId(Cow<'static, str>),

    /// An entity with the same id is already stored.
    #[error("already exists error: {0}")]
    AlreadyExists(Cow<'static, str>),

    /// An unclassified error occurred.
    #[error("other error: {0}")]
    Other(Cow<'static, str>),
}

impl LedgerStoreError {
    /// Creates an `Other` error from any type that can be converted to a string.
    pub fn other<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::Other(err.into())
    }
}
