use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// ドキュメントのフィールド（JSONオブジェクト）。
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// 論理コレクション。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// 書籍カタログ（このアプリからは読み取り専用）
    Books,
    /// 貸出台帳。各ドキュメントは `bookId` フィールドのみを持つ。
    Borrowed,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Borrowed => "borrowed",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ストアから取り出したドキュメント。
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// ドキュメントストアの抽象。Infra層が実装する。
///
/// 取得・列挙・追加・削除の4操作のみ。トランザクションやクエリは持たない。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, Self::Error>;

    /// コレクション内の全ドキュメント（順序はストア依存）。
    async fn list_documents(&self, collection: Collection) -> Result<Vec<Document>, Self::Error>;

    /// ドキュメントを追加し、ストアが採番したIDを返す。
    async fn add_document(&self, collection: Collection, fields: Fields)
        -> Result<String, Self::Error>;

    /// 存在しないIDの削除は何もしない。
    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), Self::Error>;
}
