//! In-memory entity store primitives.
//!
//! A [`Collection`] owns records of one entity kind, each keyed by a
//! monotonically assigned integer identifier. Callers get lookup, positional
//! mutation and identifier generation; nothing hands out the backing vector.

/// Identifier shared by every stored entity kind.
pub type Id = u64;

/// A record that can live in a [`Collection`].
pub trait Record: Clone {
    /// Identifier of this record.
    fn id(&self) -> Id;

    /// Overwrite the identifier. Used on insert and to re-pin it after a merge.
    fn pin_id(&mut self, id: Id);
}

/// Normalize a raw identifier (path segment, body value) to an [`Id`].
///
/// Reads like `parseInt`: leading whitespace and an optional sign are
/// skipped, then the leading run of decimal digits is the identifier and the
/// rest is ignored (`"2abc"` and `"1.0"` name records 2 and 1). No digits, or
/// a negative value, yields `None` and therefore never matches a record.
pub fn parse_id(raw: &str) -> Option<Id> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    let id = unsigned[..digits_end].parse::<Id>().ok()?;
    (!negative).then_some(id)
}

/// Ordered collection of records of a single entity kind.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
}

impl<T: Record> Collection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record with the given identifier
    pub fn find_by_id(&self, id: Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Mutable access to the record with the given identifier
    pub fn find_by_id_mut(&mut self, id: Id) -> Option<&mut T> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    /// Positional index of the record with the given identifier
    pub fn find_index(&self, id: Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// `1 + max(existing identifiers)`, or 1 when empty.
    ///
    /// Deleting the record holding the maximum identifier makes that
    /// identifier available again.
    pub fn next_id(&self) -> Id {
        self.records.iter().map(Record::id).max().unwrap_or(0) + 1
    }

    /// Assign the next identifier to `record`, append it and return a copy.
    pub fn insert_new(&mut self, mut record: T) -> T {
        let id = self.next_id();
        record.pin_id(id);
        tracing::debug!(target: "libris-db", id, "record inserted");
        self.records.push(record.clone());
        record
    }

    /// Record at a positional index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Remove and return the record at `index`.
    ///
    /// Panics if `index` is out of bounds; indices come from [`Self::find_index`].
    pub fn remove_at(&mut self, index: usize) -> T {
        self.records.remove(index)
    }

    /// Replace the record at `index`, keeping the stored identifier.
    ///
    /// Returns a copy of the record as stored. Panics if `index` is out of
    /// bounds; indices come from [`Self::find_index`].
    pub fn replace_at(&mut self, index: usize, mut record: T) -> T {
        let slot = &mut self.records[index];
        record.pin_id(slot.id());
        *slot = record;
        slot.clone()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Owned copy of every record, detached from later mutations
    pub fn snapshot(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
