use futures_util::future::join_all;

use crate::domain::model::book::Book;
use crate::domain::model::borrow::{BorrowRecord, BorrowedSet};
use crate::domain::model::id::{BookId, BorrowRecordId};
use crate::domain::store::DocumentStore;

use super::catalog::CatalogReader;
use super::error::AppError;
use super::ledger::BorrowLedger;

/// 書籍1冊の詳細と貸出状態。
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub borrow_record: Option<BorrowRecordId>,
    /// 台帳全体で借りている冊数
    pub borrowed_count: usize,
}

impl BookDetail {
    pub fn is_borrowed(&self) -> bool {
        self.borrow_record.is_some()
    }
}

/// 貸出中一覧の1行。
#[derive(Debug, Clone)]
pub struct BorrowedBook {
    pub record: BorrowRecord,
    pub book: Book,
}

/// 貸出中一覧。`held` は台帳上の冊数で、書籍が引けずに除外した行も含む。
#[derive(Debug, Clone)]
pub struct BorrowedList {
    pub books: Vec<BorrowedBook>,
    pub held: usize,
}

/// カタログと台帳を合成して詳細を組み立てる。毎回ストアから取り直す。
pub struct BookDetailAccessor<'a, S: DocumentStore> {
    catalog: &'a CatalogReader<S>,
    ledger: &'a BorrowLedger<S>,
}

impl<'a, S: DocumentStore> BookDetailAccessor<'a, S> {
    pub fn new(catalog: &'a CatalogReader<S>, ledger: &'a BorrowLedger<S>) -> Self {
        Self { catalog, ledger }
    }

    /// 書籍と台帳を同時に取得し、該当する貸出レコードを線形探索する。
    pub async fn book_detail(&self, book_id: &BookId) -> Result<BookDetail, AppError> {
        let (book, borrowed) = tokio::join!(
            self.catalog.get_book(book_id),
            self.ledger.borrowed_set()
        );
        let book = book?;
        let borrowed = borrowed?;

        Ok(BookDetail {
            borrow_record: borrowed.record_for(book_id).map(|r| r.id().clone()),
            borrowed_count: borrowed.len(),
            book,
        })
    }

    /// 貸出中の書籍一覧（台帳順）。
    ///
    /// レコードごとの書籍取得は並行に発行し、全件の完了を待つ。
    /// 書籍がカタログから消えているレコードは一覧から除外するが、上限の計算には残る。
    pub async fn borrowed_books(&self) -> Result<BorrowedList, AppError> {
        let records = self.ledger.list_borrowed().await?;
        let held = BorrowedSet::from_records(records.clone()).len();
        let results = join_all(
            records
                .iter()
                .map(|record| self.catalog.get_book(record.book_id())),
        )
        .await;

        let mut books = Vec::with_capacity(records.len());
        for (record, result) in records.into_iter().zip(results) {
            match result {
                Ok(book) => books.push(BorrowedBook { record, book }),
                Err(AppError::NotFound { .. }) => {
                    tracing::warn!(
                        record_id = %record.id(),
                        book_id = %record.book_id(),
                        "borrow record points at a missing book; skipped"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(BorrowedList { books, held })
    }
}
