//! Relationships derived at read time from field values.
//!
//! Author to book is matched by name, ignoring case, because books carry no
//! author identifier. Renaming an author or a book's author string breaks the
//! association silently.

use libris_db::{Collection, Id};

use super::models::{Author, Book};

fn same_name(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Books whose `author` equals the author's name, ignoring case (exact, not substring).
pub fn books_by_author(books: &Collection<Book>, author: &Author) -> Vec<Book> {
    books
        .iter()
        .filter(|book| same_name(&book.author, &author.name))
        .cloned()
        .collect()
}

/// Books currently on loan to `borrower_id`.
pub fn books_borrowed_by(books: &Collection<Book>, borrower_id: Id) -> Vec<Book> {
    books
        .iter()
        .filter(|book| book.borrowed_by() == Some(borrower_id))
        .cloned()
        .collect()
}

/// Whether any book names `borrower_id` as its holder.
pub fn has_outstanding_loans(books: &Collection<Book>, borrower_id: Id) -> bool {
    books
        .iter()
        .any(|book| book.borrowed_by() == Some(borrower_id))
}
