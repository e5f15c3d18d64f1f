//! Book listing filters.

use libris_db::Collection;
use serde::Serialize;

use super::models::Book;

/// Conjunctive book filter. Text filters are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub available: Option<bool>,
    pub genre: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Empty needles are treated as no filter.
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into()).filter(|g| !g.is_empty());
        self
    }

    /// Empty needles are treated as no filter.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into()).filter(|a| !a.is_empty());
        self
    }
}

/// Filtered books and how many there are.
#[derive(Debug, Clone, Serialize)]
pub struct BookListing {
    pub books: Vec<Book>,
    pub count: usize,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Apply `filter` to a snapshot of `books`: availability, then genre, then author.
pub fn filter_books(books: &Collection<Book>, filter: &BookFilter) -> BookListing {
    let mut matched = books.snapshot();

    if let Some(available) = filter.available {
        matched.retain(|book| book.is_available() == available);
    }
    if let Some(genre) = &filter.genre {
        matched.retain(|book| contains_ignore_case(&book.genre, genre));
    }
    if let Some(author) = &filter.author {
        matched.retain(|book| contains_ignore_case(&book.author, author));
    }

    let count = matched.len();
    BookListing {
        books: matched,
        count,
    }
}
