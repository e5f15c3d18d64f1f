//! Borrow and return transitions.
//!
//! A book is either `Available` or `Borrowed`. Each transition updates the
//! book and its borrower together; every check runs before the first write,
//! so a failed transition leaves both untouched.

use libris_db::Id;
use time::Date;

use super::{
    error::{ConflictReason, EntityKind, LibraryError, LibraryResult},
    models::{Book, BookState, BorrowReceipt},
    store::LibraryStore,
};

/// `Available -> Borrowed`: lend `book_id` to `borrower_id` as of `today`.
///
/// Checks in order: the book exists, it is available, the borrower exists.
/// A missing borrower identifier is reported as an unknown borrower.
pub fn borrow(
    store: &mut LibraryStore,
    book_id: Id,
    borrower_id: Option<Id>,
    today: Date,
) -> LibraryResult<BorrowReceipt> {
    let state = store
        .books
        .find_by_id(book_id)
        .map(Book::state)
        .ok_or(LibraryError::NotFound(EntityKind::Book))?;

    if state == BookState::Borrowed {
        return Err(ConflictReason::AlreadyBorrowed.into());
    }

    let borrower = borrower_id
        .and_then(|id| store.borrowers.find_by_id_mut(id))
        .ok_or(LibraryError::NotFound(EntityKind::Borrower))?;
    let book = store
        .books
        .find_by_id_mut(book_id)
        .ok_or(LibraryError::NotFound(EntityKind::Book))?;

    let borrower_id = borrower.id;
    book.lend(borrower_id, today);
    borrower.record_loan();
    let active_loans = borrower.active_loans();

    tracing::info!(
        book_id,
        borrower_id,
        active_loans,
        borrowed_on = %today,
        "book borrowed"
    );

    Ok(BorrowReceipt {
        book: book.clone(),
        borrower: borrower.name.clone(),
    })
}

/// `Borrowed -> Available`: take `book_id` back from whoever holds it.
///
/// The holder's counter is decremented but never below zero. A counter that
/// is already zero means it had drifted from book state; that is logged and
/// the return still completes.
pub fn return_book(store: &mut LibraryStore, book_id: Id) -> LibraryResult<Book> {
    let book = store
        .books
        .find_by_id_mut(book_id)
        .ok_or(LibraryError::NotFound(EntityKind::Book))?;

    let loan = book.take_back().ok_or(ConflictReason::NotBorrowed)?;
    let returned = book.clone();

    match store.borrowers.find_by_id_mut(loan.borrower_id) {
        Some(borrower) => {
            if !borrower.release_loan() {
                tracing::warn!(
                    book_id,
                    borrower_id = loan.borrower_id,
                    "borrower loan counter was already zero on return"
                );
            }
        }
        None => tracing::warn!(
            book_id,
            borrower_id = loan.borrower_id,
            "returned book referenced an unknown borrower"
        ),
    }

    tracing::info!(
        book_id,
        borrower_id = loan.borrower_id,
        borrowed_on = %loan.borrowed_on,
        "book returned"
    );

    Ok(returned)
}
