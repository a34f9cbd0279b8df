use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::id::{BookId, BorrowRecordId};
use crate::domain::error::DomainError;
use crate::domain::store::{Document, Fields};

/// 同時に借りられる書籍数の上限。
pub const MAX_BORROWED: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BorrowFields {
    book_id: BookId,
}

/// 貸出台帳のエントリ。書籍を1冊借りている状態を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    id: BorrowRecordId,
    book_id: BookId,
}

impl BorrowRecord {
    pub fn new(id: BorrowRecordId, book_id: BookId) -> Self {
        Self { id, book_id }
    }

    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        let fields: BorrowFields = serde_json::from_value(serde_json::Value::Object(doc.fields))?;
        Ok(Self {
            id: BorrowRecordId::from(doc.id),
            book_id: fields.book_id,
        })
    }

    /// 新規レコードとして書き込むフィールド（`{ "bookId": ... }`）。
    pub fn fields_for(book_id: &BookId) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            "bookId".to_string(),
            serde_json::Value::String(book_id.as_str().to_string()),
        );
        fields
    }

    pub fn id(&self) -> &BorrowRecordId {
        &self.id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }
}

/// 台帳のスナップショット。呼び出し側のセッションが保持し、
/// 書き込み前にストアから取り直すことを前提とする（キャッシュではない）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorrowedSet {
    records: Vec<BorrowRecord>,
}

impl BorrowedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<BorrowRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BorrowRecord] {
        &self.records
    }

    /// 借りている書籍の種類数。
    /// 同じ書籍に複数レコードがあっても1冊と数える。
    pub fn len(&self) -> usize {
        self.book_ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 上限までの残り冊数
    pub fn remaining(&self) -> usize {
        MAX_BORROWED.saturating_sub(self.len())
    }

    /// 重複を除いた書籍ID（台帳順）。
    pub fn book_ids(&self) -> Vec<&BookId> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| &r.book_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn contains_book(&self, book_id: &BookId) -> bool {
        self.records.iter().any(|r| &r.book_id == book_id)
    }

    pub fn contains_record(&self, record_id: &BorrowRecordId) -> bool {
        self.records.iter().any(|r| &r.id == record_id)
    }

    pub fn record_for(&self, book_id: &BookId) -> Option<&BorrowRecord> {
        self.records.iter().find(|r| &r.book_id == book_id)
    }

    /// 貸出の事前条件。重複チェック → 上限チェックの順で判定する。
    pub fn check_borrowable(&self, book_id: &BookId) -> Result<(), DomainError> {
        if self.contains_book(book_id) {
            return Err(DomainError::AlreadyBorrowed(book_id.clone()));
        }
        if self.len() >= MAX_BORROWED {
            return Err(DomainError::BorrowLimitExceeded {
                limit: MAX_BORROWED,
            });
        }
        Ok(())
    }

    /// 書き込み成功後にスナップショットへ反映する。
    pub fn insert(&mut self, record: BorrowRecord) {
        if !self.contains_record(&record.id) {
            self.records.push(record);
        }
    }

    pub fn remove(&mut self, record_id: &BorrowRecordId) -> Option<BorrowRecord> {
        let pos = self.records.iter().position(|r| &r.id == record_id)?;
        Some(self.records.remove(pos))
    }
}
