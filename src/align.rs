//! The pairwise alignment boundary.
//!
//! Every decision in the crate is taken from an [`AlignmentResult`]: one adapter scored
//! against one read window. Where that result comes from is hidden behind
//! [`AlignmentOracle`], so the decision rules can be driven by any aligner that honours
//! the contract below (and by scripted oracles in tests).
//!
//! # Contract
//! - `read_start..read_end` is half-open in the coordinates of the window that was passed in.
//! - `read_start == -1` means "no usable alignment". It is not an error; callers treat it as
//!   absent evidence and every other field as zero.
//! - `aligned_identity` is the percent identity over the aligned columns only.
//! - `full_identity` is the percent identity over the whole adapter, so unaligned adapter
//!   bases count against it.
//! - Identical inputs give identical outputs.
//!
//! [`BioOracle`] implements the contract with `bio`'s affine-gap aligner as a semi-global
//! alignment: either sequence may run off either end of the other for free, but neither
//! may be clipped where the two overlap.
use bio::alignment::pairwise::{Aligner, Scoring, MIN_SCORE};
use bio::alignment::{Alignment, AlignmentOperation};

use crate::config::ScoringScheme;

/// Outcome of aligning one adapter against one read window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentResult {
    pub read_start: i32,
    pub read_end: i32,
    pub adapter_start: i32,
    pub adapter_end: i32,
    pub raw_score: i32,
    pub aligned_identity: f64,
    pub full_identity: f64,
}

impl AlignmentResult {
    /// The "no usable alignment" sentinel.
    pub const ABSENT: AlignmentResult = AlignmentResult {
        read_start: -1,
        read_end: 0,
        adapter_start: 0,
        adapter_end: 0,
        raw_score: 0,
        aligned_identity: 0.0,
        full_identity: 0.0,
    };

    #[inline]
    pub fn is_absent(&self) -> bool { self.read_start < 0 }

    /// Number of read bases covered by the alignment (0 when absent).
    #[inline]
    pub fn read_span(&self) -> usize {
        if self.is_absent() { 0 } else { (self.read_end - self.read_start).max(0) as usize }
    }

    /// Full-length identity, or 0 when absent.
    #[inline]
    pub fn full_identity_or_zero(&self) -> f64 {
        if self.is_absent() { 0.0 } else { self.full_identity }
    }
}

/// Scores one adapter against one read window.
///
/// Implementations must be pure: the engine calls them from many worker threads and
/// relies on identical inputs producing identical results.
pub trait AlignmentOracle: Sync {
    fn align(&self, read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> AlignmentResult;
}

/// Default oracle backed by `bio::alignment::pairwise`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BioOracle;

/// Which sequence overhangs at (prefix, suffix): `true` lets adapter bases hang off the
/// read, `false` lets read bases hang off the adapter. Together the four cover every
/// free-end-gap alignment.
const OVERHANGS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

impl BioOracle {
    fn best_alignment(read: &[u8], adapter: &[u8], scheme: &ScoringScheme) -> Option<Alignment> {
        // bio charges `open + k * extend` for a k-long gap; ours is `open + (k - 1) * extend`.
        let gap_extend = scheme.gap_extend.min(0);
        let gap_open = (scheme.gap_open - gap_extend).min(0);
        let free = |on: bool| if on { 0 } else { MIN_SCORE };
        let mut best: Option<Alignment> = None;
        for (prefix, suffix) in OVERHANGS {
            let scoring = Scoring::from_scores(gap_open, gap_extend, scheme.match_score, scheme.mismatch)
                .xclip_prefix(free(prefix))
                .yclip_prefix(free(!prefix))
                .xclip_suffix(free(suffix))
                .yclip_suffix(free(!suffix));
            // adapter is x, read is y
            let mut aligner = Aligner::with_capacity_and_scoring(adapter.len(), read.len(), scoring);
            let aln = aligner.custom(adapter, read);
            if best.as_ref().map_or(true, |b| aln.score > b.score) {
                best = Some(aln);
            }
        }
        best
    }
}

/// One alignment column: (adapter base present, read base present, bases equal).
fn columns(aln: &Alignment) -> Vec<(bool, bool, bool)> {
    aln.operations
        .iter()
        .filter_map(|op| match op {
            AlignmentOperation::Match => Some((true, true, true)),
            AlignmentOperation::Subst => Some((true, true, false)),
            AlignmentOperation::Ins => Some((true, false, false)),
            AlignmentOperation::Del => Some((false, true, false)),
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => None,
        })
        .collect()
}

/// Index of the first column by which both sequences have shown a base.
fn overlap_start<'a>(mut cols: impl Iterator<Item = (usize, &'a (bool, bool, bool))>) -> Option<usize> {
    let (mut x, mut y) = (false, false);
    cols.find(|(_, c)| {
        x |= c.0;
        y |= c.1;
        x && y
    })
    .map(|(i, _)| i)
}

impl AlignmentOracle for BioOracle {
    fn align(&self, read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> AlignmentResult {
        if read.is_empty() || adapter.is_empty() {
            return AlignmentResult::ABSENT;
        }
        let Some(aln) = Self::best_alignment(read, adapter, scoring) else {
            return AlignmentResult::ABSENT;
        };
        let cols = columns(&aln);
        let (Some(first), Some(last)) = (
            overlap_start(cols.iter().enumerate()),
            overlap_start(cols.iter().enumerate().rev()),
        ) else {
            return AlignmentResult::ABSENT;
        };
        if first > last {
            return AlignmentResult::ABSENT;
        }

        let overlap = &cols[first..=last];
        let matches = overlap.iter().filter(|c| c.2).count();
        if matches == 0 {
            return AlignmentResult::ABSENT;
        }
        let read_before = cols[..first].iter().filter(|c| c.1).count();
        let adapter_before = cols[..first].iter().filter(|c| c.0).count();
        let read_start = aln.ystart + read_before;
        let read_end = read_start + overlap.iter().filter(|c| c.1).count();
        let adapter_start = aln.xstart + adapter_before;
        let adapter_end = adapter_start + overlap.iter().filter(|c| c.0).count();

        // Adapter bases hanging off the read count as unmatched columns.
        let adapter_span = match (cols.iter().position(|c| c.0), cols.iter().rposition(|c| c.0)) {
            (Some(a), Some(b)) => b - a + 1,
            _ => 0,
        };
        let overhang = aln.xstart + aln.xlen.saturating_sub(aln.xend);
        let all_matches = cols.iter().filter(|c| c.2).count();

        AlignmentResult {
            read_start: read_start as i32,
            read_end: read_end as i32,
            adapter_start: adapter_start as i32,
            adapter_end: adapter_end as i32,
            raw_score: aln.score,
            aligned_identity: 100.0 * matches as f64 / overlap.len() as f64,
            full_identity: 100.0 * all_matches as f64 / (adapter_span + overhang) as f64,
        }
    }
}
