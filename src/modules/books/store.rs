//! In-memory book storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use owl_http::error::AppError;
use thiserror::Error;
use tokio::sync::RwLock;

use super::models::{Book, BookId, BookPatch, NewBook, Page};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("book with id {0} not found")]
    NotFound(BookId),

    #[error("book with id {0} already exists")]
    DuplicateId(BookId),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(err.to_string()),
            StoreError::DuplicateId(_) => AppError::Internal(err.into()),
        }
    }
}

/// Books keyed by id plus the id counter.
///
/// A `BTreeMap` keeps iteration in ascending id order, which is also
/// insertion order because ids only grow.
#[derive(Debug, Default)]
pub struct Catalog {
    books: BTreeMap<BookId, Book>,
    last_id: BookId,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id; the first call returns 1.
    pub fn allocate_id(&mut self) -> BookId {
        self.last_id += 1;
        self.last_id
    }

    pub fn insert(&mut self, book: Book) -> Result<(), StoreError> {
        if self.books.contains_key(&book.id) {
            return Err(StoreError::DuplicateId(book.id));
        }
        self.books.insert(book.id, book);
        Ok(())
    }

    pub fn create(&mut self, new_book: NewBook) -> Book {
        let id = self.allocate_id();
        let book = new_book.into_book(id);
        // `id` is fresh, so it cannot collide.
        self.books.insert(id, book.clone());
        book
    }

    pub fn get(&self, id: BookId) -> Result<&Book, StoreError> {
        self.books.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn list(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn page(&self, page: Page) -> Vec<Book> {
        self.list()
            .skip(page.skip)
            .take(page.limit)
            .cloned()
            .collect()
    }

    pub fn update(&mut self, id: BookId, patch: BookPatch) -> Result<&Book, StoreError> {
        let book = self.books.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply_to(book);
        Ok(book)
    }

    pub fn delete(&mut self, id: BookId) -> Result<Book, StoreError> {
        self.books.remove(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Shared handle to the catalog used by the HTTP handlers.
///
/// Writers take the lock exclusively, so id allocation and insertion happen
/// as one step even under the multi-threaded runtime.
#[derive(Debug, Clone, Default)]
pub struct BookStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, new_book: NewBook) -> Book {
        let book = self.catalog.write().await.create(new_book);
        tracing::info!(book_id = book.id, title = %book.title, "book created");
        book
    }

    pub async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        self.catalog.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<Book> {
        self.catalog.read().await.list().cloned().collect()
    }

    pub async fn page(&self, page: Page) -> Vec<Book> {
        self.catalog.read().await.page(page)
    }

    pub async fn update(&self, id: BookId, patch: BookPatch) -> Result<Book, StoreError> {
        let book = self.catalog.write().await.update(id, patch)?.clone();
        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: BookId) -> Result<Book, StoreError> {
        let book = self.catalog.write().await.delete(id)?;
        tracing::info!(book_id = id, "book removed");
        Ok(book)
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.len()
    }
}
