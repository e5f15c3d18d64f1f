//! Presence checks run on incoming payloads before create and update.
//!
//! Only presence is checked; email shape and ISBN checksums are not.

use super::models::{AuthorPayload, BookPayload, BorrowerPayload};

/// Structural validation of a request payload.
pub trait Validate {
    /// Human-readable problems in field order; empty means valid.
    fn validate(&self) -> Vec<String>;
}

fn require(errors: &mut Vec<String>, value: &Option<String>, message: &str) {
    if value.as_deref().map_or(true, str::is_empty) {
        errors.push(message.to_string());
    }
}

impl Validate for BookPayload {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, &self.title, "Title is required");
        require(&mut errors, &self.author, "Author is required");
        require(&mut errors, &self.isbn, "ISBN is required");
        errors
    }
}

impl Validate for AuthorPayload {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, &self.name, "Name is required");
        errors
    }
}

impl Validate for BorrowerPayload {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, &self.name, "Name is required");
        require(&mut errors, &self.email, "Email is required");
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_book_reports_every_missing_field_in_order() {
        assert_eq!(
            BookPayload::default().validate(),
            vec!["Title is required", "Author is required", "ISBN is required"]
        );
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let payload = BookPayload {
            title: Some(String::new()),
            author: Some("Frank Herbert".into()),
            isbn: Some("x".into()),
            ..BookPayload::default()
        };
        assert_eq!(payload.validate(), vec!["Title is required"]);
    }

    #[test]
    fn presence_only_no_format_checks() {
        let payload = BorrowerPayload {
            name: Some("Ada".into()),
            email: Some("not-an-email".into()),
            membership_date: None,
        };
        assert!(payload.validate().is_empty());
    }

    #[test]
    fn author_requires_name() {
        assert_eq!(AuthorPayload::default().validate(), vec!["Name is required"]);
        let payload = AuthorPayload {
            name: Some("Ursula K. Le Guin".into()),
            ..AuthorPayload::default()
        };
        assert!(payload.validate().is_empty());
    }
}
