//! # Decomposition Output Contract
//!
//! Splitting a raw identifier into candidate forms is the job of an external
//! decomposer; [`ComposedSeqId`] is the frozen output that component hands
//! to the resolution engine. The engine only ever reads it.
//!
//! [`ComposedSeqId::from_text`] is a convenience front-end covering the
//! common textual shapes (`ACC`, `ACC.version`, `gi|123`); it exists for
//! tests and embedders without a full decomposer and is not a substitute for
//! one.

use crate::seq_id::SeqIdKind;

/// Frozen decomposition of a raw seq-id into lookup candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComposedSeqId {
    /// Normalized primary-id candidate for the primary-table lookup, if the
    /// decomposer produced one.
    pub primary_id: Option<String>,
    /// Ordered secondary-id candidates for the synonym loop.
    pub secondary_ids: Vec<String>,
    /// Effective seq-id type, when the raw identifier implied one.
    pub seq_id_type: Option<i16>,
    /// Effective version, when the raw identifier carried one.
    pub version: Option<i16>,
    /// Whether decomposition succeeded at all. When `false` the other
    /// fields are meaningless and the cascade starts at the as-is fallback.
    pub composed_ok: bool,
}

impl ComposedSeqId {
    pub fn new(
        primary_id: Option<String>,
        secondary_ids: Vec<String>,
        seq_id_type: Option<i16>,
        version: Option<i16>,
    ) -> Self {
        Self {
            primary_id,
            secondary_ids,
            seq_id_type,
            version,
            composed_ok: true,
        }
    }

    /// The contract value for a failed decomposition.
    pub fn failed() -> Self {
        Self {
            primary_id: None,
            secondary_ids: Vec::new(),
            seq_id_type: None,
            version: None,
            composed_ok: false,
        }
    }

    /// Best-effort composition from common textual forms.
    ///
    /// Recognizes `gi|<digits>` (a GI-typed secondary candidate) and
    /// `ACCESSION[.version]` (an upper-cased primary candidate). Anything
    /// empty composes as failed.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::failed();
        }

        let upper = trimmed.to_ascii_uppercase();
        if let Some(digits) = upper.strip_prefix("GI|") {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return Self::new(
                    None,
                    vec![upper.clone()],
                    Some(SeqIdKind::Gi.code()),
                    None,
                );
            }
        }

        match upper.rsplit_once('.') {
            Some((accession, suffix)) if !accession.is_empty() => match suffix.parse::<i16>() {
                Ok(version) if version >= 0 => {
                    Self::new(Some(accession.to_string()), Vec::new(), None, Some(version))
                }
                _ => Self::new(Some(upper), Vec::new(), None, None),
            },
            _ => Self::new(Some(upper), Vec::new(), None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_accession_splits() {
        let composed = ComposedSeqId::from_text("nm_000001.4");
        assert!(composed.composed_ok);
        assert_eq!(composed.primary_id.as_deref(), Some("NM_000001"));
        assert_eq!(composed.version, Some(4));
        assert!(composed.secondary_ids.is_empty());
    }

    #[test]
    fn bare_accession_keeps_version_unspecified() {
        let composed = ComposedSeqId::from_text("NM_000001");
        assert_eq!(composed.primary_id.as_deref(), Some("NM_000001"));
        assert_eq!(composed.version, None);
    }

    #[test]
    fn gi_form_becomes_secondary_candidate() {
        let composed = ComposedSeqId::from_text("gi|12345");
        assert_eq!(composed.primary_id, None);
        assert_eq!(composed.secondary_ids, vec!["GI|12345".to_string()]);
        assert_eq!(composed.seq_id_type, Some(SeqIdKind::Gi.code()));
    }

    #[test]
    fn non_numeric_suffix_is_part_of_the_accession() {
        let composed = ComposedSeqId::from_text("pdb.entry");
        assert_eq!(composed.primary_id.as_deref(), Some("PDB.ENTRY"));
        assert_eq!(composed.version, None);
    }

    #[test]
    fn empty_input_fails_composition() {
        let composed = ComposedSeqId::from_text("   ");
        assert!(!composed.composed_ok);
        assert_eq!(composed, ComposedSeqId::failed());
    }
}
