use std::sync::Arc;

use crate::domain::store::DocumentStore;

use super::catalog::CatalogReader;
use super::detail::BookDetailAccessor;
use super::ledger::BorrowLedger;

/// 1つのストアを共有するカタログ・台帳・詳細のまとめ役。
pub struct LibraryService<S: DocumentStore> {
    catalog: CatalogReader<S>,
    ledger: BorrowLedger<S>,
}

impl<S: DocumentStore> LibraryService<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared(Arc::new(store))
    }

    pub fn with_shared(store: Arc<S>) -> Self {
        Self {
            catalog: CatalogReader::new(Arc::clone(&store)),
            ledger: BorrowLedger::new(store),
        }
    }

    pub fn catalog(&self) -> &CatalogReader<S> {
        &self.catalog
    }

    pub fn ledger(&self) -> &BorrowLedger<S> {
        &self.ledger
    }

    pub fn detail(&self) -> BookDetailAccessor<'_, S> {
        BookDetailAccessor::new(&self.catalog, &self.ledger)
    }
}
