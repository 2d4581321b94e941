//! Core types for **adapter sequences** and **adapter sets**.
//!
//! An [`AdapterSet`] is what gets searched for: an optional 5′ (start) sequence and an
//! optional 3′ (end) sequence, tagged with an explicit [`AdapterRole`]. The role drives
//! every role-dependent decision (rapid suppression, barcode scoring, synthesis) so names
//! are labels only and never parsed.
//!
//! Scores on a set are filled in by discovery on a *copy* of the catalog entry; the static
//! catalog itself is never mutated.
use core::fmt;

/// Strand convention of a barcode adapter set.
///
/// A *forward* set carries the barcode on the read start and its reverse complement on the
/// read end; a *reverse* set the other way round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BarcodeOrientation { Forward, Reverse }

impl fmt::Display for BarcodeOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeOrientation::Forward => f.write_str("forward"),
            BarcodeOrientation::Reverse => f.write_str("reverse"),
        }
    }
}

/// What kind of chemistry an adapter set represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AdapterRole {
    /// Ligation, PCR or 1D^2 adapters.
    Ligation,
    /// Rapid (transposase) adapters; these chemistries have no 3′ adapter.
    Rapid,
    /// A barcode with its index (1-based) and strand convention.
    Barcode { index: u8, orientation: BarcodeOrientation },
    /// Full barcode context built after discovery from a discovered barcode.
    Synthesized { index: u8 },
}

/// An immutable named nucleotide sequence.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AdapterSequence {
    pub name: String,
    pub sequence: String,
}

impl AdapterSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self { name: name.into(), sequence: sequence.into() }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] { self.sequence.as_bytes() }
}

/// A named adapter set with per-end sequences and the best identities seen in discovery.
#[derive(Clone, Debug, PartialEq)]
pub struct AdapterSet {
    pub name: String,
    pub role: AdapterRole,
    pub start: Option<AdapterSequence>,
    pub end: Option<AdapterSequence>,
    /// Best full-length identity at read starts (0–100).
    pub best_start_score: f64,
    /// Best full-length identity at read ends (0–100).
    pub best_end_score: f64,
}

impl AdapterSet {
    pub fn new(
        name: impl Into<String>,
        role: AdapterRole,
        start: Option<AdapterSequence>,
        end: Option<AdapterSequence>,
    ) -> Self {
        Self { name: name.into(), role, start, end, best_start_score: 0.0, best_end_score: 0.0 }
    }

    /// Same sequence searched for at both ends.
    pub fn both_ends(name: impl Into<String>, role: AdapterRole, seq: AdapterSequence) -> Self {
        Self::new(name, role, Some(seq.clone()), Some(seq))
    }

    pub fn best_score(&self) -> f64 { self.best_start_score.max(self.best_end_score) }

    pub fn is_barcode(&self) -> bool { matches!(self.role, AdapterRole::Barcode { .. }) }

    pub fn is_rapid(&self) -> bool { matches!(self.role, AdapterRole::Rapid) }

    pub fn is_synthesized(&self) -> bool { matches!(self.role, AdapterRole::Synthesized { .. }) }

    pub fn barcode_orientation(&self) -> Option<BarcodeOrientation> {
        match self.role {
            AdapterRole::Barcode { orientation, .. } => Some(orientation),
            _ => None,
        }
    }

    /// Bin label for barcode sets, e.g. `BC07`.
    pub fn barcode_label(&self) -> Option<String> {
        match self.role {
            AdapterRole::Barcode { index, .. } => Some(barcode_label(index)),
            _ => None,
        }
    }

    /// Shortest of the set name and its sequence names.
    pub fn short_label(&self) -> &str {
        let mut best = self.name.as_str();
        for s in self.start.iter().chain(self.end.iter()) {
            if s.name.len() < best.len() {
                best = s.name.as_str();
            }
        }
        best
    }
}

/// `BC01`..`BC96` style label for a 1-based barcode index.
pub fn barcode_label(index: u8) -> String { format!("BC{:02}", index) }

/// Where a sequence string came from.
#[derive(Clone, Copy, Debug)]
pub struct Provenance {
    /// Human-readable source (document or repository).
    pub source: &'static str,
    /// Section or file reference within the source.
    pub reference: &'static str,
}

/// A named `(name, sequence)` pair as stored in the static tables.
pub type SeqPair = (&'static str, &'static str);

/// Static description of one adapter set, as held in `crate::data`.
#[derive(Clone, Copy, Debug)]
pub struct SetRecord {
    pub name: &'static str,
    pub role: AdapterRole,
    pub start: Option<SeqPair>,
    pub end: Option<SeqPair>,
    pub provenance: Provenance,
}

impl SetRecord {
    /// Owned, score-free [`AdapterSet`] for this record.
    pub fn to_set(&self) -> AdapterSet {
        let seq = |p: SeqPair| AdapterSequence::new(p.0, p.1);
        AdapterSet::new(self.name, self.role, self.start.map(seq), self.end.map(seq))
    }
}
