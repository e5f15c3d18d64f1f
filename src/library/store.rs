//! The three entity collections and the CRUD operations over them.
//!
//! Fields are visible to the sibling engines (lending, query, relations) but
//! not outside `library`, so every mutation goes through an operation here or
//! in `lending`.

use libris_db::{Collection, Id, Record};
use time::{macros::date, Date};

use super::{
    error::{ConflictReason, EntityKind, LibraryError, LibraryResult},
    models::{Author, AuthorPayload, Book, BookPayload, Borrower, BorrowerPayload},
    relations,
    validation::Validate,
};

#[derive(Debug, Clone, Default)]
pub struct LibraryStore {
    pub(super) books: Collection<Book>,
    pub(super) authors: Collection<Author>,
    pub(super) borrowers: Collection<Borrower>,
}

fn validated<P: Validate>(payload: &P) -> LibraryResult<()> {
    let errors = payload.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LibraryError::Validation(errors))
    }
}

fn position<T: Record>(collection: &Collection<T>, id: Id, kind: EntityKind) -> LibraryResult<usize> {
    collection
        .find_index(id)
        .ok_or(LibraryError::NotFound(kind))
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records as given, identifiers included.
    pub(crate) fn from_records(
        books: impl IntoIterator<Item = Book>,
        authors: impl IntoIterator<Item = Author>,
        borrowers: impl IntoIterator<Item = Borrower>,
    ) -> Self {
        Self {
            books: books.into_iter().collect(),
            authors: authors.into_iter().collect(),
            borrowers: borrowers.into_iter().collect(),
        }
    }

    /// The demo catalogue: three books (one on loan), three authors, two borrowers.
    pub fn demo() -> Self {
        fn book(
            id: Id,
            title: &str,
            author: &str,
            isbn: &str,
            genre: &str,
            published_year: i32,
        ) -> Book {
            let mut book = Book::from_payload(BookPayload {
                title: Some(title.to_string()),
                author: Some(author.to_string()),
                isbn: Some(isbn.to_string()),
                genre: Some(genre.to_string()),
                published_year: Some(published_year),
            });
            book.pin_id(id);
            book
        }

        fn author(id: Id, name: &str, biography: &str, birth_year: i32, nationality: &str) -> Author {
            let mut author = Author::from_payload(AuthorPayload {
                name: Some(name.to_string()),
                biography: Some(biography.to_string()),
                birth_year: Some(birth_year),
                nationality: Some(nationality.to_string()),
            });
            author.pin_id(id);
            author
        }

        fn borrower(id: Id, name: &str, email: &str, member_since: Date, active_loans: u32) -> Borrower {
            let mut borrower = Borrower::from_payload(
                BorrowerPayload {
                    name: Some(name.to_string()),
                    email: Some(email.to_string()),
                    membership_date: Some(member_since),
                },
                member_since,
            )
            .with_active_loans(active_loans);
            borrower.pin_id(id);
            borrower
        }

        let mut nineteen_eighty_four = book(
            2,
            "1984",
            "George Orwell",
            "978-0-452-28423-4",
            "Dystopian Fiction",
            1949,
        );
        nineteen_eighty_four.lend(1, date!(2024 - 01 - 15));

        Self::from_records(
            [
                book(
                    1,
                    "To Kill a Mockingbird",
                    "Harper Lee",
                    "978-0-06-112008-4",
                    "Fiction",
                    1960,
                ),
                nineteen_eighty_four,
                book(
                    3,
                    "The Great Gatsby",
                    "F. Scott Fitzgerald",
                    "978-0-7432-7356-5",
                    "Classic Literature",
                    1925,
                ),
            ],
            [
                author(
                    1,
                    "Harper Lee",
                    "American novelist known for To Kill a Mockingbird",
                    1926,
                    "American",
                ),
                author(
                    2,
                    "George Orwell",
                    "English novelist and journalist known for dystopian fiction",
                    1903,
                    "British",
                ),
                author(
                    3,
                    "F. Scott Fitzgerald",
                    "American novelist of the Lost Generation",
                    1896,
                    "American",
                ),
            ],
            [
                borrower(1, "John Smith", "john.smith@email.com", date!(2023 - 06 - 15), 1),
                borrower(2, "Jane Doe", "jane.doe@email.com", date!(2023 - 08 - 20), 0),
            ],
        )
    }

    pub fn books(&self) -> &Collection<Book> {
        &self.books
    }

    pub fn authors(&self) -> &Collection<Author> {
        &self.authors
    }

    pub fn borrowers(&self) -> &Collection<Borrower> {
        &self.borrowers
    }

    // Books

    pub fn book(&self, id: Id) -> LibraryResult<&Book> {
        self.books
            .find_by_id(id)
            .ok_or(LibraryError::NotFound(EntityKind::Book))
    }

    pub fn create_book(&mut self, payload: BookPayload) -> LibraryResult<Book> {
        validated(&payload)?;
        Ok(self.books.insert_new(Book::from_payload(payload)))
    }

    pub fn update_book(&mut self, id: Id, payload: BookPayload) -> LibraryResult<Book> {
        let index = position(&self.books, id, EntityKind::Book)?;
        validated(&payload)?;
        let merged = self
            .books
            .get(index)
            .map(|book| book.merged_with(payload))
            .ok_or(LibraryError::NotFound(EntityKind::Book))?;
        Ok(self.books.replace_at(index, merged))
    }

    /// Remove a book. A book removed while on loan releases that loan on the
    /// borrower side so the borrower's counter keeps matching book state.
    pub fn delete_book(&mut self, id: Id) -> LibraryResult<Book> {
        let index = position(&self.books, id, EntityKind::Book)?;
        let removed = self.books.remove_at(index);

        if let Some(loan) = removed.loan() {
            if let Some(borrower) = self.borrowers.find_by_id_mut(loan.borrower_id) {
                if !borrower.release_loan() {
                    tracing::warn!(
                        book_id = id,
                        borrower_id = loan.borrower_id,
                        "loan counter already at zero while deleting a borrowed book"
                    );
                }
            }
            tracing::info!(
                book_id = id,
                borrower_id = loan.borrower_id,
                "borrowed book deleted; loan released"
            );
        }

        Ok(removed)
    }

    // Authors

    pub fn author(&self, id: Id) -> LibraryResult<&Author> {
        self.authors
            .find_by_id(id)
            .ok_or(LibraryError::NotFound(EntityKind::Author))
    }

    pub fn create_author(&mut self, payload: AuthorPayload) -> LibraryResult<Author> {
        validated(&payload)?;
        Ok(self.authors.insert_new(Author::from_payload(payload)))
    }

    pub fn update_author(&mut self, id: Id, payload: AuthorPayload) -> LibraryResult<Author> {
        let index = position(&self.authors, id, EntityKind::Author)?;
        validated(&payload)?;
        let merged = self
            .authors
            .get(index)
            .map(|author| author.merged_with(payload))
            .ok_or(LibraryError::NotFound(EntityKind::Author))?;
        Ok(self.authors.replace_at(index, merged))
    }

    pub fn delete_author(&mut self, id: Id) -> LibraryResult<Author> {
        let index = position(&self.authors, id, EntityKind::Author)?;
        Ok(self.authors.remove_at(index))
    }

    // Borrowers

    pub fn borrower(&self, id: Id) -> LibraryResult<&Borrower> {
        self.borrowers
            .find_by_id(id)
            .ok_or(LibraryError::NotFound(EntityKind::Borrower))
    }

    pub fn create_borrower(&mut self, payload: BorrowerPayload, today: Date) -> LibraryResult<Borrower> {
        validated(&payload)?;
        Ok(self
            .borrowers
            .insert_new(Borrower::from_payload(payload, today)))
    }

    pub fn update_borrower(&mut self, id: Id, payload: BorrowerPayload) -> LibraryResult<Borrower> {
        let index = position(&self.borrowers, id, EntityKind::Borrower)?;
        validated(&payload)?;
        let merged = self
            .borrowers
            .get(index)
            .map(|borrower| borrower.merged_with(payload))
            .ok_or(LibraryError::NotFound(EntityKind::Borrower))?;
        Ok(self.borrowers.replace_at(index, merged))
    }

    /// Remove a borrower unless some book still names it as `borrowedBy`.
    ///
    /// The guard reads book state, not the borrower's own counter.
    pub fn delete_borrower(&mut self, id: Id) -> LibraryResult<Borrower> {
        let index = position(&self.borrowers, id, EntityKind::Borrower)?;
        if relations::has_outstanding_loans(&self.books, id) {
            return Err(ConflictReason::ActiveLoans.into());
        }
        Ok(self.borrowers.remove_at(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_payload(title: &str) -> BookPayload {
        BookPayload {
            title: Some(title.into()),
            author: Some("Frank Herbert".into()),
            isbn: Some("x".into()),
            ..BookPayload::default()
        }
    }

    fn borrower_payload(name: &str) -> BorrowerPayload {
        BorrowerPayload {
            name: Some(name.into()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            membership_date: None,
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = LibraryStore::new();
        assert_eq!(store.create_book(book_payload("Dune")).unwrap().id(), 1);
        assert_eq!(store.create_book(book_payload("Children of Dune")).unwrap().id(), 2);
    }

    #[test]
    fn create_rejects_invalid_payload_without_inserting() {
        let mut store = LibraryStore::new();
        let err = store.create_book(BookPayload::default()).unwrap_err();

        assert!(matches!(err, LibraryError::Validation(ref errors) if errors.len() == 3));
        assert!(store.books().is_empty());
    }

    #[test]
    fn update_checks_existence_before_payload() {
        let mut store = LibraryStore::new();
        let err = store.update_book(7, BookPayload::default()).unwrap_err();
        assert_eq!(err, LibraryError::NotFound(EntityKind::Book));
    }

    #[test]
    fn partial_update_missing_required_field_is_rejected() {
        let mut store = LibraryStore::demo();
        let err = store
            .update_book(
                1,
                BookPayload {
                    genre: Some("Southern Gothic".into()),
                    ..BookPayload::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, LibraryError::Validation(_)));
        assert_eq!(store.book(1).unwrap().genre, "Fiction");
    }

    #[test]
    fn update_keeps_identifier_and_loan() {
        let mut store = LibraryStore::demo();
        let updated = store.update_book(2, book_payload("Nineteen Eighty-Four")).unwrap();

        assert_eq!(updated.id(), 2);
        assert_eq!(updated.title, "Nineteen Eighty-Four");
        assert_eq!(updated.borrowed_by(), Some(1));
        assert_eq!(store.book(2).unwrap(), &updated);
    }

    #[test]
    fn deleting_borrowed_book_releases_loan() {
        let mut store = LibraryStore::demo();
        assert_eq!(store.borrower(1).unwrap().active_loans(), 1);

        store.delete_book(2).unwrap();

        assert_eq!(store.borrower(1).unwrap().active_loans(), 0);
        assert!(store.delete_borrower(1).is_ok());
    }

    #[test]
    fn delete_missing_record_is_not_found() {
        let mut store = LibraryStore::new();
        assert_eq!(
            store.delete_author(1).unwrap_err(),
            LibraryError::NotFound(EntityKind::Author)
        );
    }

    #[test]
    fn borrower_with_loan_cannot_be_deleted() {
        let mut store = LibraryStore::demo();
        let err = store.delete_borrower(1).unwrap_err();

        assert_eq!(err, LibraryError::Conflict(ConflictReason::ActiveLoans));
        assert!(store.borrower(1).is_ok());
    }

    #[test]
    fn delete_guard_ignores_stale_counter() {
        let mut book = Book::from_payload(book_payload("Dune"));
        book.pin_id(1);
        book.lend(1, date!(2024 - 02 - 01));
        let mut borrower = Borrower::from_payload(borrower_payload("Ada"), date!(2024 - 01 - 01));
        borrower.pin_id(1);

        let mut store = LibraryStore::from_records([book], [], [borrower]);
        assert_eq!(store.borrower(1).unwrap().active_loans(), 0);

        let err = store.delete_borrower(1).unwrap_err();
        assert_eq!(err, LibraryError::Conflict(ConflictReason::ActiveLoans));
    }

    #[test]
    fn borrower_update_cannot_touch_counter() {
        let mut store = LibraryStore::demo();
        let updated = store
            .update_borrower(1, borrower_payload("Johnny"))
            .unwrap();

        assert_eq!(updated.name, "Johnny");
        assert_eq!(updated.active_loans(), 1);
        assert_eq!(updated.membership_date, date!(2023 - 06 - 15));
    }

    #[test]
    fn demo_catalogue_shape() {
        let store = LibraryStore::demo();
        assert_eq!(store.books().len(), 3);
        assert_eq!(store.authors().len(), 3);
        assert_eq!(store.borrowers().len(), 2);
        assert_eq!(store.book(2).unwrap().borrowed_date(), Some(date!(2024 - 01 - 15)));
    }
}
