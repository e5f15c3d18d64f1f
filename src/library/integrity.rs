//! Recount loans from book state and compare with borrower counters.

use std::collections::BTreeMap;

use libris_db::{Id, Record};
use serde::Serialize;

use super::store::LibraryStore;

/// A disagreement between book state and borrower state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum IntegrityViolation {
    /// `activeLoans` differs from the number of books naming the borrower.
    LoanCountMismatch {
        borrower_id: Id,
        recorded: u32,
        actual: u32,
    },
    /// A book is on loan to a borrower that does not exist.
    UnknownBorrower { book_id: Id, borrower_id: Id },
}

/// Every violation in `store`: counter mismatches in borrower order, then
/// loans held by unknown borrowers in book order.
pub fn check(store: &LibraryStore) -> Vec<IntegrityViolation> {
    let mut actual: BTreeMap<Id, u32> = BTreeMap::new();
    let mut dangling = Vec::new();

    for book in store.books().iter() {
        let Some(borrower_id) = book.borrowed_by() else {
            continue;
        };
        if store.borrowers().find_by_id(borrower_id).is_none() {
            dangling.push(IntegrityViolation::UnknownBorrower {
                book_id: book.id(),
                borrower_id,
            });
        }
        *actual.entry(borrower_id).or_default() += 1;
    }

    let mut mismatches: Vec<_> = store
        .borrowers()
        .iter()
        .filter_map(|borrower| {
            let counted = actual.get(&borrower.id()).copied().unwrap_or(0);
            (counted != borrower.active_loans()).then(|| IntegrityViolation::LoanCountMismatch {
                borrower_id: borrower.id(),
                recorded: borrower.active_loans(),
                actual: counted,
            })
        })
        .collect();

    mismatches.extend(dangling);
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{Book, BookPayload, Borrower, BorrowerPayload};
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn demo_catalogue_is_consistent() {
        assert!(check(&LibraryStore::demo()).is_empty());
    }

    #[test]
    fn reports_stale_counter_and_dangling_loan() {
        let mut held = Book::from_payload(BookPayload::default());
        held.pin_id(1);
        held.lend(1, date!(2024 - 02 - 01));
        let mut orphan = Book::from_payload(BookPayload::default());
        orphan.pin_id(2);
        orphan.lend(9, date!(2024 - 02 - 02));
        let mut borrower = Borrower::from_payload(BorrowerPayload::default(), date!(2024 - 01 - 01));
        borrower.pin_id(1);

        let store = LibraryStore::from_records([held, orphan], [], [borrower]);

        assert_eq!(
            check(&store),
            vec![
                IntegrityViolation::LoanCountMismatch {
                    borrower_id: 1,
                    recorded: 0,
                    actual: 1,
                },
                IntegrityViolation::UnknownBorrower {
                    book_id: 2,
                    borrower_id: 9,
                },
            ]
        );
    }

    #[test]
    fn violations_serialize_with_kind_tag() {
        let value = serde_json::to_value(IntegrityViolation::LoanCountMismatch {
            borrower_id: 3,
            recorded: 2,
            actual: 1,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"kind": "loanCountMismatch", "borrowerId": 3, "recorded": 2, "actual": 1})
        );
    }
}
