use std::sync::Arc;

use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::store::{Collection, Document, DocumentStore};

use super::error::AppError;

/// 書籍カタログの読み取り。
pub struct CatalogReader<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> CatalogReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 全書籍（ストアの順序のまま。絞り込み・ページングなし）。
    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let docs = self
            .store
            .list_documents(Collection::Books)
            .await
            .map_err(AppError::store)?;
        tracing::debug!(count = docs.len(), "listed books");
        docs.into_iter().map(decode_book).collect()
    }

    pub async fn get_book(&self, book_id: &BookId) -> Result<Book, AppError> {
        let doc = self
            .store
            .get_document(Collection::Books, book_id.as_str())
            .await
            .map_err(AppError::store)?
            .ok_or_else(|| AppError::NotFound {
                collection: Collection::Books,
                id: book_id.to_string(),
            })?;
        decode_book(doc)
    }
}

fn decode_book(doc: Document) -> Result<Book, AppError> {
    let id = doc.id.clone();
    Book::from_document(doc).map_err(|source| AppError::MalformedDocument {
        collection: Collection::Books,
        id,
        source,
    })
}
