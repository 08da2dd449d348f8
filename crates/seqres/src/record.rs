//! # Accession and Synonym Records
//!
//! This module defines the two row shapes returned by the backing store and
//! shared by every resolution path:
//!
//! - [`BioseqInfo`] - the canonical descriptive record for a sequence, keyed
//!   by accession + version + seq-id type.
//! - [`SynonymRecord`] - a mapping row from an alternate ("secondary")
//!   identifier to a primary record's key.
//!
//! Integer fields use `-1` to mean "not specified", matching the wire
//! convention of the backing tables. The `*_opt` accessors convert that
//! sentinel into an `Option` for code that filters on the field.

/// Sentinel for an unspecified `i16` field (version, seq-id type).
pub const UNSET: i16 = -1;

/// Sentinel for an unspecified GI.
pub const UNSET_GI: i64 = -1;

/// The canonical descriptive record for a sequence.
///
/// Produced by either the primary table or (as a skeleton) from a synonym
/// mapping. Once a resolution picks a `BioseqInfo`, the record is immutable
/// for the remainder of the request.
///
/// The descriptive tail (`name`, `mol`, `length`, `state`, `date_changed`)
/// is opaque to the resolver and carried through untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BioseqInfo {
    pub accession: String,
    pub version: i16,
    pub seq_id_type: i16,
    pub gi: i64,
    pub name: String,
    pub mol: i16,
    pub length: i64,
    pub state: i8,
    pub date_changed: i64,
}

impl Default for BioseqInfo {
    fn default() -> Self {
        Self {
            accession: String::new(),
            version: UNSET,
            seq_id_type: UNSET,
            gi: UNSET_GI,
            name: String::new(),
            mol: UNSET,
            length: 0,
            state: 0,
            date_changed: 0,
        }
    }
}

impl BioseqInfo {
    /// An empty record with every key field unset.
    ///
    /// Used as the payload of a not-resolved outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a record skeleton from a synonym mapping.
    ///
    /// Only the key fields (accession, version, seq-id type, GI) are
    /// populated; the descriptive tail stays at its defaults until a
    /// confirming primary-table read fills it in.
    pub fn from_synonym(row: &SynonymRecord) -> Self {
        Self {
            accession: row.accession.clone(),
            version: row.version,
            seq_id_type: row.seq_id_type,
            gi: row.gi,
            ..Self::default()
        }
    }

    pub fn version_opt(&self) -> Option<i16> {
        (self.version >= 0).then_some(self.version)
    }

    pub fn seq_id_type_opt(&self) -> Option<i16> {
        (self.seq_id_type >= 0).then_some(self.seq_id_type)
    }

    pub fn gi_opt(&self) -> Option<i64> {
        (self.gi >= 0).then_some(self.gi)
    }
}

/// A mapping row from a secondary identifier to a primary record's key.
///
/// Transient: consumed immediately to either finish a resolution or seed a
/// confirming primary-table lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynonymRecord {
    pub secondary_id: String,
    pub secondary_id_type: i16,
    pub accession: String,
    pub version: i16,
    pub seq_id_type: i16,
    pub gi: i64,
}

impl Default for SynonymRecord {
    fn default() -> Self {
        Self {
            secondary_id: String::new(),
            secondary_id_type: UNSET,
            accession: String::new(),
            version: UNSET,
            seq_id_type: UNSET,
            gi: UNSET_GI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_copies_key_fields_only() {
        let row = SynonymRecord {
            secondary_id: "GI|555".into(),
            secondary_id_type: 12,
            accession: "NW_01".into(),
            version: 3,
            seq_id_type: 10,
            gi: 555,
        };

        let skeleton = BioseqInfo::from_synonym(&row);
        assert_eq!(skeleton.accession, "NW_01");
        assert_eq!(skeleton.version, 3);
        assert_eq!(skeleton.seq_id_type, 10);
        assert_eq!(skeleton.gi, 555);
        assert!(skeleton.name.is_empty());
        assert_eq!(skeleton.length, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_round_trips_through_json() {
        let record = BioseqInfo {
            accession: "NM_000001".into(),
            version: 2,
            seq_id_type: 10,
            gi: 37,
            name: "reference assembly".into(),
            ..BioseqInfo::default()
        };
        let json = serde_json::to_string(&record).expect("serializable");
        let parsed: BioseqInfo = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(parsed, record);
    }

    #[test]
    fn unset_fields_convert_to_none() {
        let record = BioseqInfo::empty();
        assert_eq!(record.version_opt(), None);
        assert_eq!(record.seq_id_type_opt(), None);
        assert_eq!(record.gi_opt(), None);

        let record = BioseqInfo {
            version: 0,
            gi: 0,
            ..BioseqInfo::default()
        };
        assert_eq!(record.version_opt(), Some(0));
        assert_eq!(record.gi_opt(), Some(0));
    }
}
