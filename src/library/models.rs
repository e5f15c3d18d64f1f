use libris_db::{Id, Record};
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Lending state of a [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    Borrowed,
}

/// An outstanding loan. Borrower and date only ever exist together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loan {
    pub borrower_id: Id,
    pub borrowed_on: Date,
}

/// A catalogued book.
///
/// The lending fields are not stored separately: `available`, `borrowedBy`
/// and `borrowedDate` are all projections of the single `loan` slot, so they
/// can only change together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: Id,
    pub title: String,
    /// Free-text author name, matched against `Author::name` ignoring case.
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub published_year: Option<i32>,
    loan: Option<Loan>,
}

impl Book {
    pub(crate) fn from_payload(payload: BookPayload) -> Self {
        Self {
            id: 0,
            title: payload.title.unwrap_or_default(),
            author: payload.author.unwrap_or_default(),
            isbn: payload.isbn.unwrap_or_default(),
            genre: non_empty(payload.genre).unwrap_or_else(|| "Unknown".to_string()),
            published_year: payload.published_year.filter(|year| *year != 0),
            loan: None,
        }
    }

    /// Overlay the allow-listed fields of `payload`; lending state is untouched.
    pub(crate) fn merged_with(&self, payload: BookPayload) -> Self {
        let mut merged = self.clone();
        if let Some(title) = payload.title {
            merged.title = title;
        }
        if let Some(author) = payload.author {
            merged.author = author;
        }
        if let Some(isbn) = payload.isbn {
            merged.isbn = isbn;
        }
        if let Some(genre) = payload.genre {
            merged.genre = genre;
        }
        if let Some(year) = payload.published_year {
            merged.published_year = Some(year);
        }
        merged
    }

    pub fn state(&self) -> BookState {
        match self.loan {
            Some(_) => BookState::Borrowed,
            None => BookState::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.loan.is_none()
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    pub fn borrowed_by(&self) -> Option<Id> {
        self.loan.map(|loan| loan.borrower_id)
    }

    pub fn borrowed_date(&self) -> Option<Date> {
        self.loan.map(|loan| loan.borrowed_on)
    }

    pub(crate) fn lend(&mut self, borrower_id: Id, borrowed_on: Date) {
        self.loan = Some(Loan {
            borrower_id,
            borrowed_on,
        });
    }

    pub(crate) fn take_back(&mut self) -> Option<Loan> {
        self.loan.take()
    }
}

impl Record for Book {
    fn id(&self) -> Id {
        self.id
    }

    fn pin_id(&mut self, id: Id) {
        self.id = id;
    }
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Book", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("author", &self.author)?;
        state.serialize_field("isbn", &self.isbn)?;
        state.serialize_field("genre", &self.genre)?;
        state.serialize_field("publishedYear", &self.published_year)?;
        state.serialize_field("available", &self.is_available())?;
        state.serialize_field("borrowedBy", &self.borrowed_by())?;
        state.serialize_field("borrowedDate", &self.borrowed_date())?;
        state.end()
    }
}

/// An author. Books are linked by name at read time, never by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub(crate) id: Id,
    pub name: String,
    pub biography: String,
    pub birth_year: Option<i32>,
    pub nationality: String,
}

impl Author {
    pub(crate) fn from_payload(payload: AuthorPayload) -> Self {
        Self {
            id: 0,
            name: payload.name.unwrap_or_default(),
            biography: payload.biography.unwrap_or_default(),
            birth_year: payload.birth_year.filter(|year| *year != 0),
            nationality: payload.nationality.unwrap_or_default(),
        }
    }

    pub(crate) fn merged_with(&self, payload: AuthorPayload) -> Self {
        let mut merged = self.clone();
        if let Some(name) = payload.name {
            merged.name = name;
        }
        if let Some(biography) = payload.biography {
            merged.biography = biography;
        }
        if let Some(year) = payload.birth_year {
            merged.birth_year = Some(year);
        }
        if let Some(nationality) = payload.nationality {
            merged.nationality = nationality;
        }
        merged
    }
}

impl Record for Author {
    fn id(&self) -> Id {
        self.id
    }

    fn pin_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// A library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub(crate) id: Id,
    pub name: String,
    pub email: String,
    pub membership_date: Date,
    active_loans: u32,
}

impl Borrower {
    pub(crate) fn from_payload(payload: BorrowerPayload, today: Date) -> Self {
        Self {
            id: 0,
            name: payload.name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            membership_date: payload.membership_date.unwrap_or(today),
            active_loans: 0,
        }
    }

    pub(crate) fn merged_with(&self, payload: BorrowerPayload) -> Self {
        let mut merged = self.clone();
        if let Some(name) = payload.name {
            merged.name = name;
        }
        if let Some(email) = payload.email {
            merged.email = email;
        }
        if let Some(date) = payload.membership_date {
            merged.membership_date = date;
        }
        merged
    }

    /// Number of books this borrower currently holds, as tracked by lending.
    pub fn active_loans(&self) -> u32 {
        self.active_loans
    }

    pub(crate) fn with_active_loans(mut self, active_loans: u32) -> Self {
        self.active_loans = active_loans;
        self
    }

    pub(crate) fn record_loan(&mut self) {
        self.active_loans += 1;
    }

    /// Decrement the counter, floored at zero. Returns `false` when it was
    /// already zero, i.e. the counter had drifted from book state.
    pub(crate) fn release_loan(&mut self) -> bool {
        match self.active_loans.checked_sub(1) {
            Some(remaining) => {
                self.active_loans = remaining;
                true
            }
            None => false,
        }
    }
}

impl Record for Borrower {
    fn id(&self) -> Id {
        self.id
    }

    fn pin_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Allow-listed book fields accepted on create and update. Anything else in
/// the request body, lending fields included, is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birth_year: Option<i32>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `YYYY-MM-DD`; blank counts as absent.
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub membership_date: Option<Date>,
}

fn blank_date_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => Date::parse(raw.trim(), ISO_DATE)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Author together with the books whose `author` matches its name.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

/// Borrower together with the books it currently holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerDetails {
    #[serde(flatten)]
    pub borrower: Borrower,
    pub borrowed_books: Vec<Book>,
}

/// Outcome of a successful borrow.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowReceipt {
    pub book: Book,
    /// Name of the borrower now holding the book.
    pub borrower: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn dune() -> Book {
        Book::from_payload(BookPayload {
            title: Some("Dune".into()),
            author: Some("Frank Herbert".into()),
            isbn: Some("x".into()),
            ..BookPayload::default()
        })
    }

    #[test]
    fn new_book_is_available_with_default_genre() {
        let book = dune();
        assert_eq!(book.state(), BookState::Available);
        assert_eq!(book.genre, "Unknown");
        assert_eq!(book.published_year, None);
    }

    #[test]
    fn lending_fields_serialize_together() {
        let mut book = dune();
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({
                "id": 0,
                "title": "Dune",
                "author": "Frank Herbert",
                "isbn": "x",
                "genre": "Unknown",
                "publishedYear": null,
                "available": true,
                "borrowedBy": null,
                "borrowedDate": null
            })
        );

        book.lend(1, date!(2024 - 01 - 15));
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["available"], false);
        assert_eq!(value["borrowedBy"], 1);
        assert_eq!(value["borrowedDate"], "2024-01-15");
    }

    #[test]
    fn merge_ignores_lending_state() {
        let mut book = dune();
        book.lend(2, date!(2024 - 03 - 01));

        let merged = book.merged_with(BookPayload {
            title: Some("Dune Messiah".into()),
            genre: Some("Science Fiction".into()),
            ..BookPayload::default()
        });

        assert_eq!(merged.title, "Dune Messiah");
        assert_eq!(merged.author, "Frank Herbert");
        assert_eq!(merged.borrowed_by(), Some(2));
    }

    #[test]
    fn payload_ignores_unknown_and_internal_keys() {
        let payload: BookPayload = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "x",
            "available": false,
            "borrowedBy": 9,
            "id": 42,
            "shelf": "B3"
        }))
        .unwrap();

        let book = Book::from_payload(payload);
        assert!(book.is_available());
        assert_eq!(book.id, 0);
    }

    #[test]
    fn borrower_defaults_membership_date_to_today() {
        let today = date!(2026 - 10 - 17);
        let borrower = Borrower::from_payload(
            BorrowerPayload {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                membership_date: None,
            },
            today,
        );

        assert_eq!(borrower.membership_date, today);
        assert_eq!(borrower.active_loans(), 0);
    }

    #[test]
    fn blank_membership_date_defaults_to_today() {
        let today = date!(2026 - 10 - 17);
        let payload: BorrowerPayload = serde_json::from_value(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "membershipDate": ""
        }))
        .unwrap();
        assert_eq!(payload.membership_date, None);
        assert_eq!(Borrower::from_payload(payload, today).membership_date, today);

        let payload: BorrowerPayload =
            serde_json::from_value(json!({ "membershipDate": "2023-06-15" })).unwrap();
        assert_eq!(payload.membership_date, Some(date!(2023 - 06 - 15)));

        assert!(serde_json::from_value::<BorrowerPayload>(json!({ "membershipDate": "June" })).is_err());
    }

    #[test]
    fn release_loan_floors_at_zero() {
        let mut borrower = Borrower::from_payload(BorrowerPayload::default(), date!(2024 - 01 - 01))
            .with_active_loans(1);

        assert!(borrower.release_loan());
        assert!(!borrower.release_loan());
        assert_eq!(borrower.active_loans(), 0);
    }

    #[test]
    fn borrower_details_flatten_record() {
        let borrower = Borrower::from_payload(
            BorrowerPayload {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                membership_date: Some(date!(2023 - 06 - 15)),
            },
            date!(2024 - 01 - 01),
        );
        let value = serde_json::to_value(BorrowerDetails {
            borrower,
            borrowed_books: vec![],
        })
        .unwrap();

        assert_eq!(value["membershipDate"], "2023-06-15");
        assert_eq!(value["activeLoans"], 0);
        assert_eq!(value["borrowedBooks"], json!([]));
    }
}
