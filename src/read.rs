//! The per-read unit of work.
//!
//! A [`Read`] is built once from a parsed record, mutated in place by end trimming,
//! barcode calling and middle splitting, then turned into output [`Fragment`]s.
//!
//! Coordinates: trim amounts count bases from each end of the raw sequence; the middle
//! position sets are offsets into the *end-trimmed* sequence.
use std::collections::{BTreeMap, BTreeSet};

/// Filler for missing quality values. Means "no quality information", not low quality.
pub const NO_QUAL: u8 = b'+';

/// An accepted end alignment, kept for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct EndHit {
    pub adapter: String,
    /// Half-open interval in the end window.
    pub window_start: usize,
    pub window_end: usize,
    pub aligned_identity: f64,
    pub trim_proposal: usize,
}

/// One internal adapter occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct MiddleHit {
    pub adapter: String,
    /// Half-open interval in end-trimmed coordinates.
    pub start: usize,
    pub end: usize,
    pub full_identity: f64,
}

/// A labelled score, e.g. the best barcode at one end.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// One output record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub seq: Vec<u8>,
    pub quals: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct Read {
    /// Full header line, written back on output.
    pub name: String,
    /// Uppercase, with U mapped to T for RNA reads.
    pub seq: Vec<u8>,
    /// Same length as `seq`.
    pub quals: Vec<u8>,
    /// Set when the input was RNA (more U than T); output maps T back to U.
    pub rna: bool,

    pub start_trim_amount: usize,
    pub end_trim_amount: usize,
    pub start_adapter_alignments: Vec<EndHit>,
    pub end_adapter_alignments: Vec<EndHit>,

    pub middle_adapter_positions: BTreeSet<usize>,
    pub middle_trim_positions: BTreeSet<usize>,
    pub middle_hits: Vec<MiddleHit>,

    pub start_barcode_scores: BTreeMap<String, f64>,
    pub end_barcode_scores: BTreeMap<String, f64>,
    pub best_start_barcode: Option<LabelScore>,
    pub second_best_start_barcode: Option<LabelScore>,
    pub best_end_barcode: Option<LabelScore>,
    pub second_best_end_barcode: Option<LabelScore>,
    /// `None` means "none" (unassigned).
    pub barcode_call: Option<String>,
    /// Externally supplied label; only ever used to veto a call.
    pub reference_label: Option<String>,
}

impl Read {
    /// Build a read from a parsed record. `quals` may be empty (FASTA) or short.
    pub fn new(name: impl Into<String>, seq: &[u8], quals: &[u8]) -> Self {
        let name: String = name.into();
        let mut seq: Vec<u8> = seq.iter().map(|b| b.to_ascii_uppercase()).collect();
        let u_count = seq.iter().filter(|&&b| b == b'U').count();
        let t_count = seq.iter().filter(|&&b| b == b'T').count();
        let rna = u_count > t_count;
        if rna {
            for b in seq.iter_mut() {
                if *b == b'U' { *b = b'T'; }
            }
        }
        let mut quals = quals[..quals.len().min(seq.len())].to_vec();
        quals.resize(seq.len(), NO_QUAL);
        Self {
            name: name.trim().to_string(),
            seq,
            quals,
            rna,
            start_trim_amount: 0,
            end_trim_amount: 0,
            start_adapter_alignments: Vec::new(),
            end_adapter_alignments: Vec::new(),
            middle_adapter_positions: BTreeSet::new(),
            middle_trim_positions: BTreeSet::new(),
            middle_hits: Vec::new(),
            start_barcode_scores: BTreeMap::new(),
            end_barcode_scores: BTreeMap::new(),
            best_start_barcode: None,
            second_best_start_barcode: None,
            best_end_barcode: None,
            second_best_end_barcode: None,
            barcode_call: None,
            reference_label: None,
        }
    }

    /// First whitespace-delimited token of the header.
    pub fn id(&self) -> &str { self.name.split_whitespace().next().unwrap_or("") }

    pub fn len(&self) -> usize { self.seq.len() }

    pub fn is_empty(&self) -> bool { self.seq.is_empty() }

    /// First `end_size` bases (fewer for short reads).
    pub fn start_window(&self, end_size: usize) -> &[u8] { &self.seq[..end_size.min(self.seq.len())] }

    /// Last `end_size` bases (fewer for short reads).
    pub fn end_window(&self, end_size: usize) -> &[u8] {
        &self.seq[self.seq.len().saturating_sub(end_size)..]
    }

    /// `[start, end)` of the end-trimmed read, clamped so overlapping trims give an empty range.
    pub fn trimmed_bounds(&self) -> (usize, usize) {
        let len = self.seq.len();
        let start = self.start_trim_amount.min(len);
        let end = len.saturating_sub(self.end_trim_amount).max(start);
        (start, end)
    }

    pub fn trimmed_seq(&self) -> &[u8] {
        let (s, e) = self.trimmed_bounds();
        &self.seq[s..e]
    }

    pub fn trimmed_quals(&self) -> &[u8] {
        let (s, e) = self.trimmed_bounds();
        &self.quals[s..e]
    }

    pub fn trimmed_len(&self) -> usize {
        let (s, e) = self.trimmed_bounds();
        e - s
    }

    /// Raise the start trim; trims never shrink.
    pub fn raise_start_trim(&mut self, amount: usize) {
        self.start_trim_amount = self.start_trim_amount.max(amount);
    }

    /// Raise the end trim; trims never shrink.
    pub fn raise_end_trim(&mut self, amount: usize) {
        self.end_trim_amount = self.end_trim_amount.max(amount);
    }

    pub fn has_middle_adapters(&self) -> bool { !self.middle_adapter_positions.is_empty() }

    /// The end-trimmed read cut at every trim position; parts shorter than
    /// `min_split_read_size` are dropped.
    pub fn split_parts(&self, min_split_read_size: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
        let seq = self.trimmed_seq();
        let quals = self.trimmed_quals();
        let mut parts = Vec::new();
        let mut part_start: Option<usize> = None;
        for i in 0..=seq.len() {
            let cut = i == seq.len() || self.middle_trim_positions.contains(&i);
            match (cut, part_start) {
                (true, Some(s)) => {
                    parts.push((seq[s..i].to_vec(), quals[s..i].to_vec()));
                    part_start = None;
                }
                (false, None) => part_start = Some(i),
                _ => {}
            }
        }
        parts.retain(|(s, _)| s.len() >= min_split_read_size);
        parts
    }

    fn restore_alphabet(&self, seq: &[u8]) -> Vec<u8> {
        if self.rna {
            seq.iter().map(|&b| if b == b'T' { b'U' } else { b }).collect()
        } else {
            seq.to_vec()
        }
    }

    /// Output records for this read.
    ///
    /// Reads without middle adapters give one end-trimmed record. Reads with middle
    /// adapters give nothing when `discard_middle` is set, otherwise one record per split
    /// part with `_1`, `_2`, ... appended to the read id. Empty records are never emitted.
    pub fn fragments(&self, min_split_read_size: usize, discard_middle: bool) -> Vec<Fragment> {
        if self.middle_trim_positions.is_empty() {
            let seq = self.trimmed_seq();
            if seq.is_empty() {
                return Vec::new();
            }
            return vec![Fragment {
                name: self.name.clone(),
                seq: self.restore_alphabet(seq),
                quals: self.trimmed_quals().to_vec(),
            }];
        }
        if discard_middle {
            return Vec::new();
        }
        self.split_parts(min_split_read_size)
            .into_iter()
            .enumerate()
            .map(|(i, (seq, quals))| Fragment {
                name: add_number_to_read_name(&self.name, i + 1),
                seq: self.restore_alphabet(&seq),
                quals,
            })
            .collect()
    }

    /// The read exactly as it came in (for untrimmed barcode binning).
    pub fn untrimmed_fragment(&self) -> Fragment {
        Fragment { name: self.name.clone(), seq: self.restore_alphabet(&self.seq), quals: self.quals.clone() }
    }

    /// Start and end windows with trimmed bases in lowercase, e.g. `acgtTGCA...ACGTtt`.
    pub fn end_diagnostic(&self, end_size: usize) -> String {
        let start = self.start_window(end_size);
        let cut = self.start_trim_amount.min(start.len());
        let mut out = String::with_capacity(2 * end_size + 3);
        out.extend(start[..cut].iter().map(|&b| (b as char).to_ascii_lowercase()));
        out.extend(start[cut..].iter().map(|&b| b as char));
        out.push_str("...");
        let end = self.end_window(end_size);
        let cut = end.len() - self.end_trim_amount.min(end.len());
        out.extend(end[..cut].iter().map(|&b| b as char));
        out.extend(end[cut..].iter().map(|&b| (b as char).to_ascii_lowercase()));
        out
    }

    /// One line per middle hit, empty when none were found.
    pub fn middle_diagnostic(&self) -> String {
        let mut out = String::new();
        for h in &self.middle_hits {
            out.push_str(&format!(
                "{}: found {} (read coords: {}-{}, identity: {:.1}%)\n",
                self.id(), h.adapter, h.start, h.end, h.full_identity
            ));
        }
        out
    }
}

/// `read_1`, or `read_1 comment` when the header has a comment.
pub fn add_number_to_read_name(name: &str, number: usize) -> String {
    match name.split_once(' ') {
        None => format!("{}_{}", name, number),
        Some((id, rest)) => format!("{}_{} {}", id, number, rest),
    }
}
