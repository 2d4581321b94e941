//! Internal adapter detection.
//!
//! A read containing an adapter away from its ends is usually two reads joined together.
//! Every adapter fragment is aligned against the whole end-trimmed read; each strong hit is
//! masked so it cannot be found again, and the scan repeats until the fragment stops
//! matching. Hits are padded asymmetrically into trim positions, where the read is later
//! split.
use std::collections::HashSet;

use log::trace;

use crate::adapter::{AdapterSequence, AdapterSet};
use crate::align::AlignmentOracle;
use crate::config::MiddleParams;
use crate::read::{MiddleHit, Read};

/// Upper bound on hits per fragment per read.
const MAX_HITS_PER_FRAGMENT: usize = 1_000;

const MASK: u8 = b'-';

/// Fragments to search for inside reads, and which side of a hit is the "bad" one.
#[derive(Clone, Debug, Default)]
pub struct MiddleAdapters {
    pub fragments: Vec<AdapterSequence>,
    start_names: HashSet<String>,
    end_names: HashSet<String>,
}

impl MiddleAdapters {
    /// Start fragments of `sets`, plus end fragments that differ in sequence from their start.
    pub fn from_sets(sets: &[AdapterSet]) -> Self {
        let mut out = Self::default();
        for set in sets {
            if let Some(s) = &set.start {
                out.start_names.insert(s.name.clone());
                out.fragments.push(s.clone());
            }
            if let Some(e) = &set.end {
                out.end_names.insert(e.name.clone());
                if set.start.as_ref().map_or(true, |s| s.sequence != e.sequence) {
                    out.fragments.push(e.clone());
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool { self.fragments.is_empty() }

    pub fn len(&self) -> usize { self.fragments.len() }

    /// Padding to the left and right of a hit by fragment `name`.
    fn padding(&self, name: &str, params: &MiddleParams) -> (usize, usize) {
        let left = if self.start_names.contains(name) { params.bad_side_trim } else { params.good_side_trim };
        let right = if self.end_names.contains(name) { params.bad_side_trim } else { params.good_side_trim };
        (left, right)
    }
}

/// Scan the end-trimmed read for internal adapters, filling the read's middle position
/// sets and hit log. Returns the number of hits.
pub fn find_middle_adapters<O: AlignmentOracle + ?Sized>(
    read: &mut Read,
    adapters: &MiddleAdapters,
    params: &MiddleParams,
    oracle: &O,
) -> usize {
    let mut working = read.trimmed_seq().to_vec();
    let len = working.len();
    let mut hits = 0;
    for fragment in &adapters.fragments {
        for _ in 0..MAX_HITS_PER_FRAGMENT {
            let r = oracle.align(&working, fragment.bytes(), &params.scoring);
            if r.is_absent() || r.full_identity < params.middle_threshold {
                break;
            }
            let (start, end) = (r.read_start as usize, (r.read_end as usize).min(len));
            if start >= end {
                break;
            }
            working[start..end].fill(MASK);
            read.middle_adapter_positions.extend(start..end);

            let (pad_left, pad_right) = adapters.padding(&fragment.name, params);
            let trim_start = start.saturating_sub(pad_left);
            let trim_end = (end + pad_right).min(len);
            read.middle_trim_positions.extend(trim_start..trim_end);

            trace!(
                "{}: found {} (read coords: {}-{}, identity: {:.1}%)",
                read.id(), fragment.name, start, end, r.full_identity
            );
            read.middle_hits.push(MiddleHit {
                adapter: fragment.name.clone(),
                start,
                end,
                full_identity: r.full_identity,
            });
            hits += 1;
        }
    }
    hits
}
