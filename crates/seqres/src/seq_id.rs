//! # Seq-Id Type Registry and Policy
//!
//! The backing tables key records by a small-integer seq-id type. This module
//! carries the public registry of those codes ([`SeqIdKind`]) and the two
//! pure predicates the resolution cascade consults:
//!
//! - [`SeqIdPolicy::is_insdc_type`] - whether a type belongs to the INSDC
//!   exchange family, making a zero-row typed lookup eligible for one
//!   type-relaxed retry.
//! - [`SeqIdPolicy::needs_primary_confirmation`] - whether a record skeleton
//!   adopted from a synonym mapping must be confirmed against the primary
//!   table before it can be trusted.
//!
//! Both predicates are total and side-effect free. The defaults in
//! [`NcbiSeqIdPolicy`] follow the public NCBI seq-id registry; embedders with
//! a different registry supply their own [`SeqIdPolicy`].

use crate::record::BioseqInfo;

/// Public registry of seq-id type codes.
///
/// The discriminants are the wire values stored in the backing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum SeqIdKind {
    Local = 1,
    GibbSq = 2,
    GibbMt = 3,
    Giim = 4,
    Genbank = 5,
    Embl = 6,
    Pir = 7,
    Swissprot = 8,
    Patent = 9,
    RefSeq = 10,
    General = 11,
    Gi = 12,
    Ddbj = 13,
    Prf = 14,
    Pdb = 15,
    Tpg = 16,
    Tpe = 17,
    Tpd = 18,
    Gpipe = 19,
    NamedAnnotTrack = 20,
}

impl SeqIdKind {
    /// The wire value for this kind.
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Looks up a kind by its wire value. Unknown codes return `None`.
    pub const fn from_code(code: i16) -> Option<Self> {
        Some(match code {
            1 => Self::Local,
            2 => Self::GibbSq,
            3 => Self::GibbMt,
            4 => Self::Giim,
            5 => Self::Genbank,
            6 => Self::Embl,
            7 => Self::Pir,
            8 => Self::Swissprot,
            9 => Self::Patent,
            10 => Self::RefSeq,
            11 => Self::General,
            12 => Self::Gi,
            13 => Self::Ddbj,
            14 => Self::Prf,
            15 => Self::Pdb,
            16 => Self::Tpg,
            17 => Self::Tpe,
            18 => Self::Tpd,
            19 => Self::Gpipe,
            20 => Self::NamedAnnotTrack,
            _ => return None,
        })
    }
}

/// Injectable seq-id type policy consulted by the resolution cascade.
pub trait SeqIdPolicy: Send + Sync {
    /// Whether `seq_id_type` belongs to the INSDC exchange family.
    ///
    /// A typed primary lookup that returns zero rows for such a type is
    /// retried once without the type filter.
    fn is_insdc_type(&self, seq_id_type: i16) -> bool;

    /// Whether a skeleton adopted from a synonym mapping must be confirmed
    /// by a primary-table read before resolution can finish on it.
    fn needs_primary_confirmation(&self, skeleton: &BioseqInfo) -> bool;
}

/// Default policy following the public NCBI seq-id registry.
///
/// INSDC membership: GenBank, EMBL, DDBJ and the third-party TPG/TPE/TPD
/// types. Confirmation is required for GI-typed skeletons, whose mappings
/// carry too little context to be trusted on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NcbiSeqIdPolicy;

impl SeqIdPolicy for NcbiSeqIdPolicy {
    fn is_insdc_type(&self, seq_id_type: i16) -> bool {
        matches!(
            SeqIdKind::from_code(seq_id_type),
            Some(
                SeqIdKind::Genbank
                    | SeqIdKind::Embl
                    | SeqIdKind::Ddbj
                    | SeqIdKind::Tpg
                    | SeqIdKind::Tpe
                    | SeqIdKind::Tpd
            )
        )
    }

    fn needs_primary_confirmation(&self, skeleton: &BioseqInfo) -> bool {
        skeleton.seq_id_type == SeqIdKind::Gi.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 1..=20 {
            let kind = SeqIdKind::from_code(code).expect("registered code");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(SeqIdKind::from_code(0), None);
        assert_eq!(SeqIdKind::from_code(21), None);
        assert_eq!(SeqIdKind::from_code(-1), None);
    }

    #[test]
    fn insdc_membership_is_the_exchange_family() {
        let policy = NcbiSeqIdPolicy;
        for kind in [
            SeqIdKind::Genbank,
            SeqIdKind::Embl,
            SeqIdKind::Ddbj,
            SeqIdKind::Tpg,
            SeqIdKind::Tpe,
            SeqIdKind::Tpd,
        ] {
            assert!(policy.is_insdc_type(kind.code()), "{kind:?}");
        }
        for kind in [SeqIdKind::Local, SeqIdKind::RefSeq, SeqIdKind::Gi, SeqIdKind::Pdb] {
            assert!(!policy.is_insdc_type(kind.code()), "{kind:?}");
        }
        // Total over the whole i16 domain, including unknown codes.
        assert!(!policy.is_insdc_type(-1));
        assert!(!policy.is_insdc_type(999));
    }

    #[test]
    fn gi_skeletons_need_confirmation() {
        let policy = NcbiSeqIdPolicy;
        let mut skeleton = BioseqInfo {
            accession: "NM_000001".into(),
            seq_id_type: SeqIdKind::Gi.code(),
            ..BioseqInfo::default()
        };
        assert!(policy.needs_primary_confirmation(&skeleton));

        skeleton.seq_id_type = SeqIdKind::RefSeq.code();
        assert!(!policy.needs_primary_confirmation(&skeleton));
    }
}
