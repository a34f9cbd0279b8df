use super::model::id::{BookId, BorrowRecordId};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("book already borrowed: {0}")]
    AlreadyBorrowed(BookId),

    #[error("borrow limit reached: cannot borrow more than {limit} books at a time")]
    BorrowLimitExceeded { limit: usize },

    #[error("no active borrow record: {0}")]
    NoActiveBorrow(String),
}

impl DomainError {
    pub(crate) fn no_record(id: &BorrowRecordId) -> Self {
        DomainError::NoActiveBorrow(id.to_string())
    }

    pub(crate) fn no_record_for_book(book_id: &BookId) -> Self {
        DomainError::NoActiveBorrow(format!("book {book_id}"))
    }
}
