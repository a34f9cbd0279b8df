use crate::domain::error::DomainError;
use crate::domain::store::Collection;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{collection} not found: {id}")]
    NotFound { collection: Collection, id: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("malformed {collection} document {id}: {source}")]
    MalformedDocument {
        collection: Collection,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    pub(crate) fn store<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AppError::StoreUnavailable(Box::new(e))
    }

    /// 利用者側の入力・状態に起因するエラーか（ストア障害ではない）。
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::Domain(_) | AppError::NotFound { .. })
    }
}
