//! Registry of searchable adapter sets, and synthesis of full barcode context.
//!
//! [`AdapterCatalog::standard`] holds every static set from `crate::data` plus one forward
//! and one reverse set per barcode core. After discovery has decided which sets are in
//! play, [`add_full_barcode_sets`] appends *synthesized* sets that splice each discovered
//! barcode into its expected flanking sequence, so the whole barcode adapter gets trimmed
//! rather than just the core.
use crate::adapter::{AdapterRole, AdapterSequence, AdapterSet, BarcodeOrientation};
use crate::data::barcodes::{
    BARCODES, NATIVE_END_3, NATIVE_END_5, NATIVE_START_3, NATIVE_START_5, RAPID_3, RAPID_NEW_5,
    RAPID_OLD_5,
};
use crate::data::{adapters::ADAPTER_SETS, legacy::LEGACY};

/// Which rapid barcode generation a full sequence is built for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RapidVariant {
    /// First generation: ligation trunk + rapid adapter, requires `SQK-NSK007` and `Rapid`.
    Old,
    /// RBK004: requires `RBK004_upstream`.
    New,
}

/// An ordered collection of adapter sets.
#[derive(Clone, Debug, Default)]
pub struct AdapterCatalog {
    sets: Vec<AdapterSet>,
}

impl AdapterCatalog {
    /// All built-in adapter and barcode sets.
    pub fn standard() -> Self {
        let mut sets: Vec<AdapterSet> = ADAPTER_SETS.iter().chain(LEGACY.iter()).map(|r| r.to_set()).collect();
        sets.extend(barcode_sets());
        Self { sets }
    }

    /// A catalog of caller-supplied sets (e.g. custom chemistries in tests).
    pub fn from_sets(sets: Vec<AdapterSet>) -> Self { Self { sets } }

    pub fn entries(&self) -> &[AdapterSet] { &self.sets }

    pub fn len(&self) -> usize { self.sets.len() }

    pub fn is_empty(&self) -> bool { self.sets.is_empty() }

    pub fn find(&self, name: &str) -> Option<&AdapterSet> { self.sets.iter().find(|s| s.name == name) }

    /// Sets that make sense to discover: synthesized full sequences are excluded since
    /// they only exist once their prerequisites have been found.
    pub fn discoverable(&self) -> Vec<AdapterSet> {
        self.sets.iter().filter(|s| !s.is_synthesized()).cloned().collect()
    }
}

/// Set name for a barcode index and orientation, e.g. `Barcode 3 (reverse)`.
pub fn barcode_set_name(index: u8, orientation: BarcodeOrientation) -> String {
    format!("Barcode {} ({})", index, orientation)
}

/// Forward and reverse sets for every barcode core.
pub fn barcode_sets() -> Vec<AdapterSet> {
    let mut out = Vec::with_capacity(BARCODES.len() * 2);
    for orientation in [BarcodeOrientation::Reverse, BarcodeOrientation::Forward] {
        for (i, &(name, seq, rev_name, rev_seq)) in BARCODES.iter().enumerate() {
            let index = (i + 1) as u8;
            let core = AdapterSequence::new(name, seq);
            let rev = AdapterSequence::new(rev_name, rev_seq);
            let (start, end) = match orientation {
                BarcodeOrientation::Forward => (core, rev),
                BarcodeOrientation::Reverse => (rev, core),
            };
            out.push(AdapterSet::new(
                barcode_set_name(index, orientation),
                AdapterRole::Barcode { index, orientation },
                Some(start),
                Some(end),
            ));
        }
    }
    out
}

fn found<'a>(discovered: &'a [AdapterSet], name: &str) -> Option<&'a AdapterSet> {
    discovered.iter().find(|s| s.name == name)
}

/// Full native barcode for barcode `index`, built from its discovered reverse set.
///
/// Returns `None` when `Barcode {index} (reverse)` was not discovered.
pub fn full_native_barcode(index: u8, discovered: &[AdapterSet]) -> Option<AdapterSet> {
    let bc = found(discovered, &barcode_set_name(index, BarcodeOrientation::Reverse))?;
    let start = bc.start.as_ref()?;
    let end = bc.end.as_ref()?;
    let start_full = format!("{}{}{}", NATIVE_START_5, start.sequence, NATIVE_START_3);
    let end_full = format!("{}{}{}", NATIVE_END_5, end.sequence, NATIVE_END_3);
    Some(AdapterSet::new(
        format!("Native barcoding {} (full sequence)", index),
        AdapterRole::Synthesized { index },
        Some(AdapterSequence::new(format!("NB{:02}_start", index), start_full)),
        Some(AdapterSequence::new(format!("NB{:02}_end", index), end_full)),
    ))
}

/// Full rapid barcode (start only) for barcode `index`, built from its discovered forward set.
///
/// Returns `None` unless the forward barcode and the variant's upstream sets were discovered.
pub fn full_rapid_barcode(index: u8, variant: RapidVariant, discovered: &[AdapterSet]) -> Option<AdapterSet> {
    let (prereqs, upstream, suffix): (&[&str], &str, &str) = match variant {
        RapidVariant::Old => (&["SQK-NSK007", "Rapid"], RAPID_OLD_5, "old"),
        RapidVariant::New => (&["RBK004_upstream"], RAPID_NEW_5, "RBK004"),
    };
    if !prereqs.iter().all(|p| found(discovered, p).is_some()) {
        return None;
    }
    let bc = found(discovered, &barcode_set_name(index, BarcodeOrientation::Forward))?;
    let core = bc.start.as_ref()?;
    let full = format!("{}{}{}", upstream, core.sequence, RAPID_3);
    Some(AdapterSet::new(
        format!("Rapid barcoding {} (full sequence, {})", index, suffix),
        AdapterRole::Synthesized { index },
        Some(AdapterSequence::new(format!("RB{:02}_full_{}", index, suffix), full)),
        None,
    ))
}

/// Append every synthesizable full barcode set to `discovered`; returns how many were added.
///
/// Sets already present by name are not added twice.
pub fn add_full_barcode_sets(discovered: &mut Vec<AdapterSet>) -> usize {
    let indices: Vec<(u8, BarcodeOrientation)> = discovered
        .iter()
        .filter_map(|s| match s.role {
            AdapterRole::Barcode { index, orientation } => Some((index, orientation)),
            _ => None,
        })
        .collect();
    let mut extra = Vec::new();
    for (index, orientation) in indices {
        let candidates = match orientation {
            BarcodeOrientation::Reverse => vec![full_native_barcode(index, discovered)],
            BarcodeOrientation::Forward => vec![
                full_rapid_barcode(index, RapidVariant::Old, discovered),
                full_rapid_barcode(index, RapidVariant::New, discovered),
            ],
        };
        for set in candidates.into_iter().flatten() {
            if found(discovered, &set.name).is_none() && !extra.iter().any(|e: &AdapterSet| e.name == set.name) {
                extra.push(set);
            }
        }
    }
    let n = extra.len();
    discovered.extend(extra);
    n
}

#[cfg(test)]
mod catalog_tests {
    use super::*;

    fn discovered(names: &[&str]) -> Vec<AdapterSet> {
        let cat = AdapterCatalog::standard();
        names.iter().map(|n| cat.find(n).cloned().unwrap()).collect()
    }

    #[test]
    fn standard_catalog_has_both_orientations_for_every_barcode() {
        let cat = AdapterCatalog::standard();
        assert_eq!(cat.entries().iter().filter(|s| s.is_barcode()).count(), 24);
        let fwd = cat.find("Barcode 1 (forward)").unwrap();
        assert_eq!(fwd.start.as_ref().unwrap().name, "BC01");
        assert_eq!(fwd.end.as_ref().unwrap().name, "BC01_rev");
        let rev = cat.find("Barcode 1 (reverse)").unwrap();
        assert_eq!(rev.start.as_ref().unwrap().name, "BC01_rev");
        assert!(cat.find("Rapid").unwrap().end.is_none());
    }

    #[test]
    fn standard_catalog_has_no_synthesized_sets() {
        let cat = AdapterCatalog::standard();
        assert_eq!(cat.discoverable().len(), cat.len());
    }

    #[test]
    fn full_native_barcode_splices_reverse_barcode() {
        let d = discovered(&["SQK-NSK007", "Barcode 1 (reverse)"]);
        let full = full_native_barcode(1, &d).unwrap();
        let start = &full.start.as_ref().unwrap().sequence;
        assert_eq!(
            start,
            "AATGTACTTCGTTCAGTTACGTATTGCTAAGGTTAACACAAAGACACCGACAACTTTCTTCAGCACCT"
        );
        let end = &full.end.as_ref().unwrap().sequence;
        assert!(end.starts_with("AGGTGCTGAAGAAAGTTGTCGGTGTCTTTGTGTTAACCT"));
        assert!(full.is_synthesized());
    }

    #[test]
    fn missing_prerequisite_means_no_synthesis() {
        let d = discovered(&["SQK-NSK007", "Barcode 2 (forward)"]);
        assert!(full_native_barcode(2, &d).is_none());
        assert!(full_rapid_barcode(2, RapidVariant::Old, &d).is_none());
        assert!(full_rapid_barcode(2, RapidVariant::New, &d).is_none());
    }

    #[test]
    fn rapid_variants_follow_upstream_fragment() {
        let old = discovered(&["SQK-NSK007", "Rapid", "Barcode 4 (forward)"]);
        let set = full_rapid_barcode(4, RapidVariant::Old, &old).unwrap();
        assert!(set.end.is_none());
        assert!(set.start.as_ref().unwrap().sequence.starts_with(RAPID_OLD_5));

        let new = discovered(&["RBK004_upstream", "Barcode 4 (forward)"]);
        let set = full_rapid_barcode(4, RapidVariant::New, &new).unwrap();
        assert!(set.start.as_ref().unwrap().sequence.ends_with(RAPID_3));
    }

    #[test]
    fn add_full_sets_is_idempotent() {
        let mut d = discovered(&["SQK-NSK007", "Rapid", "Barcode 1 (reverse)", "Barcode 2 (forward)"]);
        assert_eq!(add_full_barcode_sets(&mut d), 2);
        assert_eq!(add_full_barcode_sets(&mut d), 0);
        assert!(d.iter().any(|s| s.name == "Native barcoding 1 (full sequence)"));
        assert!(d.iter().any(|s| s.name == "Rapid barcoding 2 (full sequence, old)"));
    }
}
