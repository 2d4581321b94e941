//! End trimming.
//!
//! Each matching set's start sequence is aligned against the read's start window and its
//! end sequence against the end window. Accepted alignments propose a trim; the read keeps
//! the largest proposal per end. Barcode identities are recorded on the way, by their own
//! criterion.
use crate::adapter::AdapterSet;
use crate::align::{AlignmentOracle, AlignmentResult};
use crate::config::EndTrimParams;
use crate::read::{EndHit, Read};

#[derive(Clone, Copy, PartialEq, Eq)]
enum End { Start, End }

/// Whether an alignment is good enough to trim on.
///
/// The alignment must not touch the window edge facing the read interior: a hit running
/// into that edge may be a partial match of ordinary sequence. Edges are measured against
/// `end_size` even when the read is shorter than a window.
fn accepted(r: &AlignmentResult, end: End, params: &EndTrimParams) -> bool {
    if r.is_absent() || r.aligned_identity <= params.end_threshold || r.read_span() < params.min_trim_size {
        return false;
    }
    match end {
        End::Start => r.read_end as usize != params.end_size,
        End::End => r.read_start != 0,
    }
}

fn trim_end<O: AlignmentOracle + ?Sized>(
    read: &mut Read,
    sets: &[AdapterSet],
    params: &EndTrimParams,
    oracle: &O,
    end: End,
) {
    let window = match end {
        End::Start => read.start_window(params.end_size).to_vec(),
        End::End => read.end_window(params.end_size).to_vec(),
    };
    for set in sets {
        let adapter = match end {
            End::Start => set.start.as_ref(),
            End::End => set.end.as_ref(),
        };
        let Some(adapter) = adapter else { continue };
        let r = oracle.align(&window, adapter.bytes(), &params.scoring);

        if let (Some(wanted), Some(label)) = (params.barcode_orientation, set.barcode_label()) {
            if set.barcode_orientation() == Some(wanted) {
                let scores = match end {
                    End::Start => &mut read.start_barcode_scores,
                    End::End => &mut read.end_barcode_scores,
                };
                let entry = scores.entry(label).or_insert(0.0);
                *entry = entry.max(r.full_identity_or_zero());
            }
        }

        if !accepted(&r, end, params) {
            continue;
        }
        // May exceed a short read; trimmed views clamp.
        let proposal = match end {
            End::Start => r.read_end as usize + params.extra_trim,
            End::End => params.end_size.saturating_sub(r.read_start as usize) + params.extra_trim,
        };
        let hit = EndHit {
            adapter: adapter.name.clone(),
            window_start: r.read_start as usize,
            window_end: r.read_end as usize,
            aligned_identity: r.aligned_identity,
            trim_proposal: proposal,
        };
        match end {
            End::Start => {
                read.raise_start_trim(proposal);
                read.start_adapter_alignments.push(hit);
            }
            End::End => {
                read.raise_end_trim(proposal);
                read.end_adapter_alignments.push(hit);
            }
        }
    }
}

/// Raise `read.start_trim_amount` from the start sequences of `sets`.
pub fn find_start_trim<O: AlignmentOracle + ?Sized>(read: &mut Read, sets: &[AdapterSet], params: &EndTrimParams, oracle: &O) {
    trim_end(read, sets, params, oracle, End::Start);
}

/// Raise `read.end_trim_amount` from the end sequences of `sets`.
pub fn find_end_trim<O: AlignmentOracle + ?Sized>(read: &mut Read, sets: &[AdapterSet], params: &EndTrimParams, oracle: &O) {
    trim_end(read, sets, params, oracle, End::End);
}

/// Both ends.
pub fn trim_read_ends<O: AlignmentOracle + ?Sized>(read: &mut Read, sets: &[AdapterSet], params: &EndTrimParams, oracle: &O) {
    find_start_trim(read, sets, params, oracle);
    find_end_trim(read, sets, params, oracle);
}

#[cfg(test)]
mod trim_tests {
    use super::*;
    use crate::adapter::{AdapterRole, AdapterSequence, BarcodeOrientation};
    use crate::align::testing::{hit, random_seq, FixedOracle};
    use crate::align::BioOracle;
    use crate::config::ScoringScheme;

    const ADAPTER: &str = "AATGTACTTCGTTCAGTTACGTATTGCT";

    fn params() -> EndTrimParams {
        EndTrimParams {
            end_size: 100,
            extra_trim: 2,
            end_threshold: 75.0,
            min_trim_size: 4,
            scoring: ScoringScheme::default(),
            barcode_orientation: None,
        }
    }

    fn set(name: &str, start: &str, end: &str) -> AdapterSet {
        AdapterSet::new(
            name,
            AdapterRole::Ligation,
            Some(AdapterSequence::new(format!("{}_start", name), start)),
            Some(AdapterSequence::new(format!("{}_end", name), end)),
        )
    }

    fn long_read() -> Read { Read::new("r", &random_seq(10_000, 1), b"") }

    #[test]
    fn perfect_28bp_hit_trims_30() {
        let mut read = long_read();
        let oracle = FixedOracle::default().with("AAAA", hit(0, 28, 100.0));
        find_start_trim(&mut read, &[set("x", "AAAA", "CCCC")], &params(), &oracle);
        assert_eq!(read.start_trim_amount, 30);
        assert_eq!(read.start_adapter_alignments.len(), 1);
        assert_eq!(read.start_adapter_alignments[0].adapter, "x_start");
    }

    #[test]
    fn end_trim_counts_from_window_end() {
        let mut read = long_read();
        let oracle = FixedOracle::default().with("CCCC", hit(72, 100, 100.0));
        find_end_trim(&mut read, &[set("x", "AAAA", "CCCC")], &params(), &oracle);
        assert_eq!(read.end_trim_amount, 30);
        assert_eq!(read.start_trim_amount, 0);
    }

    #[test]
    fn hits_touching_the_inner_edge_are_rejected() {
        let mut read = long_read();
        let oracle = FixedOracle::default()
            .with("AAAA", hit(72, 100, 100.0))
            .with("CCCC", hit(0, 28, 100.0));
        trim_read_ends(&mut read, &[set("x", "AAAA", "CCCC")], &params(), &oracle);
        assert_eq!((read.start_trim_amount, read.end_trim_amount), (0, 0));
    }

    #[test]
    fn weak_or_short_hits_are_rejected() {
        let mut read = long_read();
        let oracle = FixedOracle::default()
            .with("AAAA", hit(0, 28, 75.0))
            .with("CCCC", hit(97, 100, 100.0));
        trim_read_ends(&mut read, &[set("x", "AAAA", "CCCC")], &params(), &oracle);
        assert_eq!((read.start_trim_amount, read.end_trim_amount), (0, 0));
        assert!(read.start_adapter_alignments.is_empty());
    }

    #[test]
    fn trim_is_max_of_proposals_and_subsets_trim_no_more() {
        let sets = [set("a", "AAAA", "CCCC"), set("b", "GGGG", "TTTT")];
        let oracle = FixedOracle::default()
            .with("AAAA", hit(5, 20, 90.0))
            .with("GGGG", hit(10, 40, 90.0))
            .with("CCCC", hit(60, 95, 90.0))
            .with("TTTT", hit(80, 99, 90.0));

        let mut all = long_read();
        trim_read_ends(&mut all, &sets, &params(), &oracle);
        assert_eq!(all.start_trim_amount, 42);
        assert_eq!(all.end_trim_amount, 42);

        let mut subset = long_read();
        trim_read_ends(&mut subset, &sets[1..], &params(), &oracle);
        assert!(subset.start_trim_amount <= all.start_trim_amount);
        assert!(subset.end_trim_amount <= all.end_trim_amount);
        assert_eq!(subset.end_trim_amount, 22);
    }

    #[test]
    fn barcode_scores_recorded_regardless_of_acceptance() {
        let bc = |orientation, start: &str| {
            AdapterSet::new(
                format!("Barcode 3 ({})", orientation),
                AdapterRole::Barcode { index: 3, orientation },
                Some(AdapterSequence::new("s", start)),
                None,
            )
        };
        let sets = [bc(BarcodeOrientation::Forward, "ACGT"), bc(BarcodeOrientation::Reverse, "TGCA")];
        let oracle = FixedOracle::default()
            .with("ACGT", hit(70, 100, 88.0))
            .with("TGCA", hit(0, 20, 99.0));
        let p = EndTrimParams { barcode_orientation: Some(BarcodeOrientation::Forward), ..params() };
        let mut read = long_read();
        find_start_trim(&mut read, &sets, &p, &oracle);
        assert_eq!(read.start_barcode_scores.get("BC03"), Some(&88.0));
        assert_eq!(read.start_barcode_scores.len(), 1);
        // the reverse set still trims
        assert_eq!(read.start_trim_amount, 22);
    }

    #[test]
    fn absent_alignment_changes_nothing() {
        let mut read = long_read();
        let p = EndTrimParams { barcode_orientation: Some(BarcodeOrientation::Forward), ..params() };
        trim_read_ends(&mut read, &[set("x", "AAAA", "CCCC")], &p, &FixedOracle::default());
        assert_eq!((read.start_trim_amount, read.end_trim_amount), (0, 0));
        assert!(read.start_barcode_scores.is_empty());
    }

    #[test]
    fn short_reads_measure_edges_against_end_size() {
        let mut read = Read::new("r", &random_seq(60, 4), b"");
        let oracle = FixedOracle::default()
            .with("AAAA", hit(10, 60, 100.0))
            .with("CCCC", hit(20, 60, 100.0));
        trim_read_ends(&mut read, &[set("x", "AAAA", "CCCC")], &params(), &oracle);
        assert_eq!(read.start_trim_amount, 62);
        assert_eq!(read.end_trim_amount, 100 - 20 + 2);
        assert_eq!(read.trimmed_len(), 0);
    }

    #[test]
    fn barcode_without_alignment_scores_zero() {
        let set = AdapterSet::new(
            "Barcode 5 (forward)",
            AdapterRole::Barcode { index: 5, orientation: BarcodeOrientation::Forward },
            Some(AdapterSequence::new("s", "ACGT")),
            None,
        );
        let p = EndTrimParams { barcode_orientation: Some(BarcodeOrientation::Forward), ..params() };
        let mut read = long_read();
        find_start_trim(&mut read, &[set], &p, &FixedOracle::default());
        assert_eq!(read.start_barcode_scores.get("BC05"), Some(&0.0));
        assert_eq!(read.start_trim_amount, 0);
    }

    #[test]
    fn adapter_free_reads_keep_their_ends() {
        let catalog = crate::catalog::AdapterCatalog::standard();
        let sets: Vec<AdapterSet> = ["SQK-LSK114", "SQK-NSK007"]
            .iter()
            .filter_map(|n| catalog.find(n).cloned())
            .collect();
        assert_eq!(sets.len(), 2);
        let mut total = 0;
        for i in 0..50 {
            let mut read = Read::new(format!("r{}", i), &random_seq(2_000, 300 + i), b"");
            trim_read_ends(&mut read, &sets, &params(), &BioOracle);
            // chance overlaps of a few bases at the very read edge are all that may match
            assert!(read.start_trim_amount <= 20, "read {} start trim {}", i, read.start_trim_amount);
            assert!(read.end_trim_amount <= 20, "read {} end trim {}", i, read.end_trim_amount);
            total += read.start_trim_amount + read.end_trim_amount;
        }
        assert!(total < 1_000, "{} bases trimmed from adapter-free reads", total);
    }

    #[test]
    fn real_adapter_at_read_start_is_trimmed() {
        let mut seq = random_seq(5, 21);
        seq.extend_from_slice(ADAPTER.as_bytes());
        seq.extend(random_seq(2_000, 22));
        let mut read = Read::new("r", &seq, b"");
        find_start_trim(&mut read, &[set("nsk", ADAPTER, "GCAATACGTAACTGAACGAAGT")], &params(), &BioOracle);
        assert_eq!(read.start_trim_amount, 5 + ADAPTER.len() + 2);
    }
}
