use libris_db::{parse_id, Id};
use serde::Deserialize;
use serde_json::Value;

use crate::library::BookFilter;

/// Query string accepted by `GET /api/books`.
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    /// Any value other than `true` selects borrowed books.
    pub available: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        let mut filter = BookFilter::new();
        if let Some(available) = query.available {
            filter = filter.available(available == "true");
        }
        if let Some(genre) = query.genre {
            filter = filter.genre(genre);
        }
        if let Some(author) = query.author {
            filter = filter.author(author);
        }
        filter
    }
}

/// Body of `POST /api/books/{id}/borrow`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Borrower identifier as a JSON number or numeric string.
    pub borrower_id: Option<Value>,
}

impl BorrowRequest {
    /// The normalized borrower identifier, if it names one at all
    pub fn borrower_id(&self) -> Option<Id> {
        match self.borrower_id.as_ref()? {
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                    .map(|float| float as Id)
            }),
            Value::String(raw) => parse_id(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn available_is_true_only_for_literal_true() {
        let query = BookQuery {
            available: Some("yes".into()),
            ..BookQuery::default()
        };
        assert_eq!(BookFilter::from(query).available, Some(false));

        let query = BookQuery {
            available: Some("true".into()),
            genre: Some(String::new()),
            ..BookQuery::default()
        };
        let filter = BookFilter::from(query);
        assert_eq!(filter.available, Some(true));
        assert_eq!(filter.genre, None);
    }

    #[test]
    fn borrower_id_accepts_numbers_and_numeric_strings() {
        let parse = |body: Value| serde_json::from_value::<BorrowRequest>(body).unwrap().borrower_id();

        assert_eq!(parse(json!({"borrowerId": 2})), Some(2));
        assert_eq!(parse(json!({"borrowerId": "2"})), Some(2));
        assert_eq!(parse(json!({"borrowerId": 2.0})), Some(2));
        assert_eq!(parse(json!({"borrowerId": "2abc"})), Some(2));
        assert_eq!(parse(json!({"borrowerId": 2.5})), None);
        assert_eq!(parse(json!({"borrowerId": "two"})), None);
        assert_eq!(parse(json!({"borrowerId": -1})), None);
        assert_eq!(parse(json!({"borrowerId": null})), None);
        assert_eq!(parse(json!({})), None);
    }
}
