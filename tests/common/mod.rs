//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;

use bookshelf_mcp::application::service::LibraryService;
use bookshelf_mcp::domain::model::id::BookId;
use bookshelf_mcp::domain::store::{Collection, Document, DocumentStore, Fields};

// =============================================================================
// MemoryStore — テスト用ドキュメントストア
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error: {0}")]
pub struct MemoryStoreError(String);

/// ファイルI/O不要のインメモリストア。IDは "doc-1", "doc-2", ... と採番する。
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    next_id: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 任意IDでドキュメントを直接書き込む（カタログの外部投入を模す）。
    pub fn insert(&self, collection: Collection, id: &str, fields: Fields) {
        self.collections
            .write()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(Document::new(id, fields));
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, Self::Error> {
        let guard = self.collections.read().unwrap();
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn list_documents(&self, collection: Collection) -> Result<Vec<Document>, Self::Error> {
        let guard = self.collections.read().unwrap();
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn add_document(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, Self::Error> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("doc-{n}");
        self.insert(collection, &id, fields);
        Ok(id)
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), Self::Error> {
        if let Some(docs) = self.collections.write().unwrap().get_mut(&collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

// =============================================================================
// FailingStore — 常に失敗するストア（通信断）
// =============================================================================

pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    type Error = MemoryStoreError;

    async fn get_document(
        &self,
        _collection: Collection,
        _id: &str,
    ) -> Result<Option<Document>, Self::Error> {
        Err(MemoryStoreError("connection refused".into()))
    }

    async fn list_documents(&self, _collection: Collection) -> Result<Vec<Document>, Self::Error> {
        Err(MemoryStoreError("connection refused".into()))
    }

    async fn add_document(
        &self,
        _collection: Collection,
        _fields: Fields,
    ) -> Result<String, Self::Error> {
        Err(MemoryStoreError("connection refused".into()))
    }

    async fn delete_document(&self, _collection: Collection, _id: &str) -> Result<(), Self::Error> {
        Err(MemoryStoreError("connection refused".into()))
    }
}

// =============================================================================
// YieldingStore — 読み取りと書き込みの間で他タスクに譲るストア
// =============================================================================

/// `list_documents` / `add_document` の途中でスケジューラに制御を返す。
/// 同一スレッド上で並行に走る書き込みを実際にインターリーブさせるために使う。
pub struct YieldingStore {
    inner: Arc<MemoryStore>,
}

impl YieldingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentStore for YieldingStore {
    type Error = MemoryStoreError;

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, Self::Error> {
        self.inner.get_document(collection, id).await
    }

    async fn list_documents(&self, collection: Collection) -> Result<Vec<Document>, Self::Error> {
        let docs = self.inner.list_documents(collection).await?;
        tokio::task::yield_now().await;
        Ok(docs)
    }

    async fn add_document(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, Self::Error> {
        tokio::task::yield_now().await;
        self.inner.add_document(collection, fields).await
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), Self::Error> {
        tokio::task::yield_now().await;
        self.inner.delete_document(collection, id).await
    }
}

// =============================================================================
// TestCatalog — 書籍投入済みのストア作成ヘルパー
// =============================================================================

pub fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("fields must be an object, got {other}"),
    }
}

pub fn book_fields(title: &str, author: &str) -> Fields {
    fields(json!({
        "title": title,
        "author": author,
        "rating": 4.0,
        "summary": format!("A book called {title}."),
        "coverUrl": format!("https://covers.example.com/{}.jpg", title.to_lowercase()),
    }))
}

pub struct TestCatalog;

impl TestCatalog {
    /// 標準的なテスト用カタログ: a, b, c, d の4冊。
    pub fn standard() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.insert(Collection::Books, "a", book_fields("Anathem", "Neal Stephenson"));
        store.insert(Collection::Books, "b", book_fields("Beloved", "Toni Morrison"));
        store.insert(Collection::Books, "c", book_fields("Contact", "Carl Sagan"));
        store.insert(Collection::Books, "d", book_fields("Dune", "Frank Herbert"));
        Arc::new(store)
    }

    pub fn service(store: &Arc<MemoryStore>) -> LibraryService<MemoryStore> {
        LibraryService::with_shared(Arc::clone(store))
    }
}

pub fn id(s: &str) -> BookId {
    BookId::new(s)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
