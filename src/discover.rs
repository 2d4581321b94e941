//! Adapter-set discovery.
//!
//! Aligns every discoverable catalog entry against the ends of a read sample and keeps the
//! sets whose best full-length identity clears the adapter threshold. The result is a new
//! [`Discovery`] snapshot; the catalog is left untouched.
use log::{debug, info};
use rayon::prelude::*;

use crate::adapter::{AdapterSet, BarcodeOrientation};
use crate::align::AlignmentOracle;
use crate::catalog::AdapterCatalog;
use crate::config::DiscoveryParams;
use crate::error::{CleaverError, Result};
use crate::read::Read;

const ONE_D2_PART_1: &str = "1D^2 part 1";
const ONE_D2_PART_2: &str = "1D^2 part 2";
const LIGATION_TRUNK: &str = "SQK-NSK007";

/// Outcome of discovery.
#[derive(Clone, Debug)]
pub struct Discovery {
    /// Every discoverable entry with its best start/end identity, in catalog order.
    pub scored: Vec<AdapterSet>,
    /// Entries that cleared the threshold, after post-filters.
    pub matching: Vec<AdapterSet>,
    /// Barcode orientation; only set when binning was requested.
    pub orientation: Option<BarcodeOrientation>,
}

/// Per-entry `(best_start, best_end)` identities for one read.
fn score_read<O: AlignmentOracle + ?Sized>(
    read: &Read,
    entries: &[AdapterSet],
    params: &DiscoveryParams,
    oracle: &O,
    acc: &mut [(f64, f64)],
) {
    let start = read.start_window(params.end_size);
    let end = read.end_window(params.end_size);
    for (set, best) in entries.iter().zip(acc.iter_mut()) {
        if let Some(s) = &set.start {
            let r = oracle.align(start, s.bytes(), &params.scoring);
            best.0 = best.0.max(r.full_identity_or_zero());
        }
        if let Some(e) = &set.end {
            let r = oracle.align(end, e.bytes(), &params.scoring);
            best.1 = best.1.max(r.full_identity_or_zero());
        }
    }
}

/// Score the catalog against `sample` and select the adapter sets present in the run.
///
/// Runs on the current rayon pool. Each worker keeps its own maxima, which are merged in a
/// single reduce, so the result does not depend on the number of workers.
///
/// Errors with [`CleaverError::NoBarcodeSignal`] when binning was requested and no
/// barcode set matched.
pub fn discover_adapter_sets<O: AlignmentOracle + ?Sized>(
    sample: &[Read],
    catalog: &AdapterCatalog,
    params: &DiscoveryParams,
    oracle: &O,
) -> Result<Discovery> {
    let entries = catalog.discoverable();
    let n = entries.len();
    let maxima = sample
        .par_iter()
        .fold(
            || vec![(0.0f64, 0.0f64); n],
            |mut acc, read| {
                score_read(read, &entries, params, oracle, &mut acc);
                acc
            },
        )
        .reduce(
            || vec![(0.0f64, 0.0f64); n],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    x.0 = x.0.max(y.0);
                    x.1 = x.1.max(y.1);
                }
                a
            },
        );

    let scored: Vec<AdapterSet> = entries
        .into_iter()
        .zip(maxima)
        .map(|(mut set, (s, e))| {
            set.best_start_score = s;
            set.best_end_score = e;
            set
        })
        .collect();
    for s in &scored {
        debug!("{}: start {:.1}%, end {:.1}%", s.name, s.best_start_score, s.best_end_score);
    }

    let mut matching: Vec<AdapterSet> = scored
        .iter()
        .filter(|s| s.best_score() >= params.adapter_threshold)
        .cloned()
        .collect();
    suppress_rapid_ends(&mut matching);
    resolve_one_d2_overlap(&mut matching);

    let orientation = if params.barcode_binning {
        Some(choose_orientation(&matching, &scored, params.adapter_threshold)?)
    } else {
        None
    };

    if matching.is_empty() {
        info!("No adapters found in {} sampled reads", sample.len());
    } else {
        let names: Vec<&str> = matching.iter().map(|s| s.name.as_str()).collect();
        info!("Adapter sets found in {} sampled reads: {}", sample.len(), names.join(", "));
    }
    if let Some(o) = orientation {
        info!("Barcodes determined to be in {} orientation", o);
    }
    Ok(Discovery { scored, matching, orientation })
}

/// Rapid chemistries leave no 3′ adapter, so when one is present no end sequence is searched.
fn suppress_rapid_ends(matching: &mut [AdapterSet]) {
    if matching.iter().any(|s| s.is_rapid()) {
        for s in matching.iter_mut() {
            s.end = None;
        }
    }
}

/// `1D^2 part 2` and the ligation trunk overlap. With `1D^2 part 1` present, keep only the
/// stronger of the two unless part 1 itself scores below the weaker one.
fn resolve_one_d2_overlap(matching: &mut Vec<AdapterSet>) {
    let score = |name: &str| matching.iter().find(|s| s.name == name).map(|s| s.best_score());
    let (Some(part_1), Some(part_2), Some(trunk)) =
        (score(ONE_D2_PART_1), score(ONE_D2_PART_2), score(LIGATION_TRUNK))
    else {
        return;
    };
    let (weaker, weaker_score) =
        if part_2 < trunk { (ONE_D2_PART_2, part_2) } else { (LIGATION_TRUNK, trunk) };
    if part_1 >= weaker_score {
        debug!("dropping {} in favour of the overlapping 1D^2 sets", weaker);
        matching.retain(|s| s.name != weaker);
    }
}

/// Pick the barcode strand convention from the matching barcode sets.
pub fn choose_orientation(
    matching: &[AdapterSet],
    scored: &[AdapterSet],
    threshold: f64,
) -> Result<BarcodeOrientation> {
    let (mut fwd_best, mut rev_best, mut fwd_sum, mut rev_sum) = (0.0, 0.0, 0.0, 0.0);
    let mut any = false;
    for s in matching {
        match s.barcode_orientation() {
            Some(BarcodeOrientation::Forward) => {
                fwd_best += s.best_score();
                fwd_sum += s.best_start_score + s.best_end_score;
            }
            Some(BarcodeOrientation::Reverse) => {
                rev_best += s.best_score();
                rev_sum += s.best_start_score + s.best_end_score;
            }
            None => continue,
        }
        any = true;
    }
    if !any {
        let best = scored
            .iter()
            .filter(|s| s.is_barcode())
            .map(|s| s.best_score())
            .fold(0.0, f64::max);
        return Err(CleaverError::NoBarcodeSignal { best, threshold });
    }
    Ok(if fwd_best != rev_best {
        if fwd_best > rev_best { BarcodeOrientation::Forward } else { BarcodeOrientation::Reverse }
    } else if fwd_sum != rev_sum {
        if fwd_sum > rev_sum { BarcodeOrientation::Forward } else { BarcodeOrientation::Reverse }
    } else {
        BarcodeOrientation::Forward
    })
}
