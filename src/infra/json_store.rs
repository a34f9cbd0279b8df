use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::store::{Collection, Document, DocumentStore, Fields};

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// ファイル全体の構造。コレクションごとに ID → フィールド。
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    books: BTreeMap<String, Fields>,
    #[serde(default)]
    borrowed: BTreeMap<String, Fields>,
}

impl StoreFile {
    fn collection(&self, collection: Collection) -> &BTreeMap<String, Fields> {
        match collection {
            Collection::Books => &self.books,
            Collection::Borrowed => &self.borrowed,
        }
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut BTreeMap<String, Fields> {
        match collection {
            Collection::Books => &mut self.books,
            Collection::Borrowed => &mut self.borrowed,
        }
    }
}

/// JSONファイルによるDocumentStore実装。
/// 1ストア = 1 JSONファイル（`books` と `borrowed` の両コレクションを持つ）。
/// ファイルが無ければ空として扱い、最初の書き込みで作成する。
pub struct JsonDocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile, JsonStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, file: &StoreFile) -> Result<(), JsonStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    type Error = JsonStoreError;

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, Self::Error> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file
            .collection(collection)
            .get(id)
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn list_documents(&self, collection: Collection) -> Result<Vec<Document>, Self::Error> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file
            .collection(collection)
            .iter()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn add_document(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, Self::Error> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        file.collection_mut(collection).insert(id.clone(), fields);
        self.save(&file).await?;
        Ok(id)
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        if file.collection_mut(collection).remove(id).is_some() {
            self.save(&file).await?;
        }
        Ok(())
    }
}
