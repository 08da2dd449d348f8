//! # Candidate Row Disambiguation
//!
//! A lookup against either backing table returns zero or more rows where the
//! cascade needs exactly one. The rules here turn a fetched row set into a
//! three-way [`RowMatch`] and are shared by the asynchronous engine and the
//! cache-first synchronous path, so both produce identical picks:
//!
//! 1. One row: unique hit.
//! 2. Multiple rows with no requested version: collapse to the row with the
//!    strictly greatest version. Ties keep the first row seen.
//! 3. Multiple rows with a requested version: ambiguous - the table violated
//!    its own key, and the caller decides whether that continues the cascade
//!    or is a hard error.

/// Access to the version field shared by both record shapes.
pub trait Versioned {
    fn record_version(&self) -> i16;
}

impl Versioned for crate::record::BioseqInfo {
    fn record_version(&self) -> i16 {
        self.version
    }
}

impl Versioned for crate::record::SynonymRecord {
    fn record_version(&self) -> i16 {
        self.version
    }
}

/// Outcome of disambiguating one fetched row set.
#[derive(Debug, Clone, PartialEq)]
pub enum RowMatch<R> {
    /// Exactly one usable row, possibly after a version collapse.
    Unique(R),
    /// No rows matched.
    Missing,
    /// More than one row matched a fully specified key; carries the count
    /// for diagnostics.
    Ambiguous(usize),
}

/// Reduces a fetched row set to a [`RowMatch`] under the version the caller
/// originally requested (`None` = unspecified).
pub fn disambiguate<R: Versioned>(rows: Vec<R>, requested_version: Option<i16>) -> RowMatch<R> {
    if rows.len() > 1 && requested_version.is_some() {
        return RowMatch::Ambiguous(rows.len());
    }
    match collapse_newest(rows) {
        Some(row) => RowMatch::Unique(row),
        None => RowMatch::Missing,
    }
}

/// Picks the row with the strictly greatest version, first seen winning
/// ties. Empty input yields `None`.
pub fn collapse_newest<R: Versioned>(rows: Vec<R>) -> Option<R> {
    let mut best: Option<R> = None;
    for row in rows {
        match &best {
            Some(current) if row.record_version() <= current.record_version() => {}
            _ => best = Some(row),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        version: i16,
        tag: usize,
    }

    impl Versioned for Row {
        fn record_version(&self) -> i16 {
            self.version
        }
    }

    fn rows(versions: &[i16]) -> Vec<Row> {
        versions
            .iter()
            .enumerate()
            .map(|(tag, &version)| Row { version, tag })
            .collect()
    }

    #[test]
    fn single_row_is_unique() {
        match disambiguate(rows(&[7]), Some(7)) {
            RowMatch::Unique(row) => assert_eq!(row.version, 7),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_set_is_missing() {
        assert_eq!(disambiguate(rows(&[]), None), RowMatch::Missing);
        assert_eq!(disambiguate(rows(&[]), Some(1)), RowMatch::Missing);
    }

    #[test]
    fn collapse_keeps_first_of_tied_maximum() {
        // Versions [3,1,5,5,2]: the winner is the version-5 row at index 2,
        // not the later duplicate at index 3.
        match disambiguate(rows(&[3, 1, 5, 5, 2]), None) {
            RowMatch::Unique(row) => {
                assert_eq!(row.version, 5);
                assert_eq!(row.tag, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn multiple_rows_with_requested_version_are_ambiguous() {
        assert_eq!(disambiguate(rows(&[2, 2]), Some(2)), RowMatch::Ambiguous(2));
        assert_eq!(
            disambiguate(rows(&[1, 2, 3]), Some(1)),
            RowMatch::Ambiguous(3)
        );
    }

    #[test]
    fn collapse_of_single_row_returns_it() {
        let picked = collapse_newest(rows(&[4])).expect("one row in");
        assert_eq!(picked.version, 4);
        assert!(collapse_newest(rows(&[])).is_none());
    }
}
