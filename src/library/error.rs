use std::fmt;

use thiserror::Error;

/// Entity kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Author,
    Borrower,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Book => "Book",
            EntityKind::Author => "Author",
            EntityKind::Borrower => "Borrower",
        })
    }
}

/// Business rules a request can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("Book is already borrowed")]
    AlreadyBorrowed,
    #[error("Book is not currently borrowed")]
    NotBorrowed,
    #[error("Cannot delete borrower with active loans")]
    ActiveLoans,
}

/// Every failure a library operation can report. None of them leaves a
/// partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("Validation errors")]
    Validation(Vec<String>),

    #[error(transparent)]
    Conflict(#[from] ConflictReason),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
