//! Library inventory core: entities, validation, queries, lending, and
//! derived relationships.
//!
//! [`Library`] is the only entry point for request handlers. It owns the
//! store behind a single lock, so each operation (including borrow and
//! return, which touch books and borrowers together) runs as one critical
//! section.

pub mod error;
pub mod integrity;
pub mod lending;
pub mod models;
pub mod query;
pub mod relations;
pub mod store;
pub mod validation;

use std::sync::Arc;

use libris_db::Id;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;

pub use error::{ConflictReason, EntityKind, LibraryError, LibraryResult};
pub use integrity::IntegrityViolation;
pub use models::{
    Author, AuthorDetails, AuthorPayload, Book, BookPayload, BookState, BorrowReceipt, Borrower,
    BorrowerDetails, BorrowerPayload,
};
pub use query::{BookFilter, BookListing};
pub use store::LibraryStore;

/// Source of "today" for lending and membership dates.
pub type Clock = Arc<dyn Fn() -> Date + Send + Sync>;

/// Current UTC calendar date.
pub fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Shared handle to the library store.
#[derive(Clone)]
pub struct Library {
    store: Arc<RwLock<LibraryStore>>,
    clock: Clock,
}

impl Library {
    /// Empty library using the UTC clock
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(LibraryStore::new())),
            clock: Arc::new(utc_today),
        }
    }

    /// Replace the clock, e.g. to pin dates in tests
    pub fn with_clock(mut self, clock: impl Fn() -> Date + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> Date {
        (self.clock)()
    }

    /// Replace the whole store with the demo catalogue.
    pub async fn seed_demo(&self) {
        *self.store.write().await = LibraryStore::demo();
    }

    pub async fn integrity_report(&self) -> Vec<IntegrityViolation> {
        integrity::check(&*self.store.read().await)
    }

    // Books

    pub async fn list_books(&self, filter: &BookFilter) -> BookListing {
        query::filter_books(self.store.read().await.books(), filter)
    }

    pub async fn get_book(&self, id: Id) -> LibraryResult<Book> {
        self.store.read().await.book(id).cloned()
    }

    pub async fn create_book(&self, payload: BookPayload) -> LibraryResult<Book> {
        self.store.write().await.create_book(payload)
    }

    pub async fn update_book(&self, id: Id, payload: BookPayload) -> LibraryResult<Book> {
        self.store.write().await.update_book(id, payload)
    }

    pub async fn delete_book(&self, id: Id) -> LibraryResult<Book> {
        self.store.write().await.delete_book(id)
    }

    pub async fn borrow_book(
        &self,
        book_id: Id,
        borrower_id: Option<Id>,
    ) -> LibraryResult<BorrowReceipt> {
        let today = self.today();
        lending::borrow(&mut *self.store.write().await, book_id, borrower_id, today)
    }

    pub async fn return_book(&self, book_id: Id) -> LibraryResult<Book> {
        lending::return_book(&mut *self.store.write().await, book_id)
    }

    // Authors

    pub async fn list_authors(&self) -> Vec<Author> {
        self.store.read().await.authors().snapshot()
    }

    /// Author plus the books whose author name matches it
    pub async fn get_author(&self, id: Id) -> LibraryResult<AuthorDetails> {
        let store = self.store.read().await;
        let author = store.author(id)?.clone();
        let books = relations::books_by_author(store.books(), &author);
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, payload: AuthorPayload) -> LibraryResult<Author> {
        self.store.write().await.create_author(payload)
    }

    pub async fn update_author(&self, id: Id, payload: AuthorPayload) -> LibraryResult<Author> {
        self.store.write().await.update_author(id, payload)
    }

    pub async fn delete_author(&self, id: Id) -> LibraryResult<Author> {
        self.store.write().await.delete_author(id)
    }

    // Borrowers

    pub async fn list_borrowers(&self) -> Vec<Borrower> {
        self.store.read().await.borrowers().snapshot()
    }

    /// Borrower plus the books it currently holds
    pub async fn get_borrower(&self, id: Id) -> LibraryResult<BorrowerDetails> {
        let store = self.store.read().await;
        let borrower = store.borrower(id)?.clone();
        let borrowed_books = relations::books_borrowed_by(store.books(), id);
        Ok(BorrowerDetails {
            borrower,
            borrowed_books,
        })
    }

    pub async fn create_borrower(&self, payload: BorrowerPayload) -> LibraryResult<Borrower> {
        let today = self.today();
        self.store.write().await.create_borrower(payload, today)
    }

    pub async fn update_borrower(&self, id: Id, payload: BorrowerPayload) -> LibraryResult<Borrower> {
        self.store.write().await.update_borrower(id, payload)
    }

    pub async fn delete_borrower(&self, id: Id) -> LibraryResult<Borrower> {
        self.store.write().await.delete_borrower(id)
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
