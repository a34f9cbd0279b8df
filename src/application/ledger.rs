use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::error::DomainError;
use crate::domain::model::borrow::{BorrowRecord, BorrowedSet};
use crate::domain::model::id::{BookId, BorrowRecordId};
use crate::domain::store::{Collection, Document, DocumentStore};

use super::error::AppError;

/// 貸出台帳の管理。上限3冊と二重貸出の禁止を守る。
///
/// `borrow` / `return_borrow` は渡されたスナップショットで判定してから書き込む
/// （読み取りと書き込みの間は無防備）。同じ台帳を通る書き込みを直列化したい場合は
/// `checkout` / `check_in` を使う。
pub struct BorrowLedger<S: DocumentStore> {
    store: Arc<S>,
    write_gate: Mutex<()>,
}

impl<S: DocumentStore> BorrowLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// 現在の貸出レコードを全件取得する。
    pub async fn list_borrowed(&self) -> Result<Vec<BorrowRecord>, AppError> {
        let docs = self
            .store
            .list_documents(Collection::Borrowed)
            .await
            .map_err(AppError::store)?;
        tracing::debug!(count = docs.len(), "listed borrow records");
        docs.into_iter().map(decode_record).collect()
    }

    /// ストアから取り直したスナップショット。
    pub async fn borrowed_set(&self) -> Result<BorrowedSet, AppError> {
        Ok(BorrowedSet::from_records(self.list_borrowed().await?))
    }

    pub fn is_borrowed(book_id: &BookId, borrowed: &BorrowedSet) -> bool {
        borrowed.contains_book(book_id)
    }

    /// 事前条件（重複 → 上限）を確認してから貸出レコードを追加する。
    pub async fn borrow(
        &self,
        book_id: &BookId,
        borrowed: &BorrowedSet,
    ) -> Result<BorrowRecord, AppError> {
        borrowed.check_borrowable(book_id)?;

        let id = self
            .store
            .add_document(Collection::Borrowed, BorrowRecord::fields_for(book_id))
            .await
            .map_err(AppError::store)?;
        let record = BorrowRecord::new(BorrowRecordId::from(id), book_id.clone());
        tracing::info!(book_id = %book_id, record_id = %record.id(), "book borrowed");
        Ok(record)
    }

    /// 貸出レコードを削除する。スナップショットにないIDは `NoActiveBorrow`。
    pub async fn return_borrow(
        &self,
        record_id: &BorrowRecordId,
        borrowed: &BorrowedSet,
    ) -> Result<(), AppError> {
        if !borrowed.contains_record(record_id) {
            return Err(DomainError::no_record(record_id).into());
        }

        self.store
            .delete_document(Collection::Borrowed, record_id.as_str())
            .await
            .map_err(AppError::store)?;
        tracing::info!(record_id = %record_id, "book returned");
        Ok(())
    }

    /// 直列化された貸出。台帳を取り直し、書籍の存在を確認してから `borrow` する。
    pub async fn checkout(&self, book_id: &BookId) -> Result<BorrowRecord, AppError> {
        let _gate = self.write_gate.lock().await;
        self.ensure_book_exists(book_id).await?;
        let borrowed = self.borrowed_set().await?;
        self.borrow(book_id, &borrowed).await
    }

    /// 直列化された返却。書籍IDから貸出レコードを引いて削除し、そのレコードを返す。
    pub async fn check_in(&self, book_id: &BookId) -> Result<BorrowRecord, AppError> {
        let _gate = self.write_gate.lock().await;
        let borrowed = self.borrowed_set().await?;
        let record = borrowed
            .record_for(book_id)
            .cloned()
            .ok_or_else(|| DomainError::no_record_for_book(book_id))?;
        self.return_borrow(record.id(), &borrowed).await?;
        Ok(record)
    }

    async fn ensure_book_exists(&self, book_id: &BookId) -> Result<(), AppError> {
        let found = self
            .store
            .get_document(Collection::Books, book_id.as_str())
            .await
            .map_err(AppError::store)?;
        match found {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound {
                collection: Collection::Books,
                id: book_id.to_string(),
            }),
        }
    }
}

fn decode_record(doc: Document) -> Result<BorrowRecord, AppError> {
    let id = doc.id.clone();
    BorrowRecord::from_document(doc).map_err(|source| AppError::MalformedDocument {
        collection: Collection::Borrowed,
        id,
        source,
    })
}
