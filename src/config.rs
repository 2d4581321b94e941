//! Run configuration: the scoring scheme and every threshold the engine consumes.
//!
//! [`TrimOpts`] is the single value the binary builds from its arguments; the stage
//! functions take the narrower parameter structs derived from it so tests can build
//! them directly.
use std::path::PathBuf;
use std::str::FromStr;

use crate::adapter::BarcodeOrientation;
use crate::error::{CleaverError, Result};

/// Integer alignment scores: match, mismatch, gap open, gap extend.
///
/// A gap of length `k` costs `gap_open + (k - 1) * gap_extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringScheme {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self { match_score: 3, mismatch: -6, gap_open: -5, gap_extend: -2 }
    }
}

impl FromStr for ScoringScheme {
    type Err = CleaverError;

    /// Parse `"match,mismatch,gap_open,gap_extend"`, e.g. `"3,-6,-5,-2"`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = |reason: &str| CleaverError::InvalidScoringScheme {
            scheme: s.to_string(),
            reason: reason.to_string(),
        };
        let vals = s
            .split(',')
            .map(|t| t.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| bad("expected four comma-separated integers"))?;
        let &[match_score, mismatch, gap_open, gap_extend] = vals.as_slice() else {
            return Err(bad("expected four comma-separated integers"));
        };
        if match_score <= 0 {
            return Err(bad("match score must be positive"));
        }
        if mismatch > 0 || gap_open > 0 || gap_extend > 0 {
            return Err(bad("mismatch and gap scores must not be positive"));
        }
        Ok(Self { match_score, mismatch, gap_open, gap_extend })
    }
}

impl std::fmt::Display for ScoringScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.match_score, self.mismatch, self.gap_open, self.gap_extend)
    }
}

/// Output format for rendered reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat { Auto, Fasta, Fastq }

impl FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fasta" => Ok(Self::Fasta),
            "fastq" => Ok(Self::Fastq),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

/// Parameters for adapter-set discovery.
#[derive(Clone, Debug)]
pub struct DiscoveryParams {
    pub end_size: usize,
    pub adapter_threshold: f64,
    pub scoring: ScoringScheme,
    /// When set, discovery must find a barcode orientation or fail.
    pub barcode_binning: bool,
}

/// Parameters for end trimming.
#[derive(Clone, Debug)]
pub struct EndTrimParams {
    pub end_size: usize,
    pub extra_trim: usize,
    pub end_threshold: f64,
    pub min_trim_size: usize,
    pub scoring: ScoringScheme,
    /// Barcode orientation chosen by discovery; `None` disables barcode score recording.
    pub barcode_orientation: Option<BarcodeOrientation>,
}

/// Parameters for barcode calling.
#[derive(Clone, Debug)]
pub struct BarcodeParams {
    pub threshold: f64,
    pub diff: f64,
    pub require_two_barcodes: bool,
}

/// Parameters for middle-adapter splitting.
#[derive(Clone, Debug)]
pub struct MiddleParams {
    pub middle_threshold: f64,
    pub good_side_trim: usize,
    pub bad_side_trim: usize,
    pub scoring: ScoringScheme,
}

/// Everything a run needs. Defaults match the command-line defaults.
#[derive(Clone, Debug)]
pub struct TrimOpts {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub threads: usize,
    pub verbosity: u8,

    pub barcode_dir: Option<PathBuf>,
    pub barcode_labels: Option<PathBuf>,
    pub barcode_threshold: f64,
    pub barcode_diff: f64,
    pub require_two_barcodes: bool,
    pub untrimmed: bool,
    pub discard_unassigned: bool,

    pub adapter_threshold: f64,
    pub check_reads: usize,
    pub scoring: ScoringScheme,

    pub end_size: usize,
    pub min_trim_size: usize,
    pub extra_end_trim: usize,
    pub end_threshold: f64,

    pub no_split: bool,
    pub discard_middle: bool,
    pub middle_threshold: f64,
    pub extra_middle_trim_good_side: usize,
    pub extra_middle_trim_bad_side: usize,
    pub min_split_read_size: usize,
}

/// Default worker count: all logical cores, capped at 16.
pub fn default_threads() -> usize {
    num_cpus::get().clamp(1, 16)
}

impl Default for TrimOpts {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            format: OutputFormat::Auto,
            threads: default_threads(),
            verbosity: 1,
            barcode_dir: None,
            barcode_labels: None,
            barcode_threshold: 75.0,
            barcode_diff: 5.0,
            require_two_barcodes: false,
            untrimmed: false,
            discard_unassigned: false,
            adapter_threshold: 90.0,
            check_reads: 10_000,
            scoring: ScoringScheme::default(),
            end_size: 100,
            min_trim_size: 4,
            extra_end_trim: 2,
            end_threshold: 75.0,
            no_split: false,
            discard_middle: false,
            middle_threshold: 85.0,
            extra_middle_trim_good_side: 10,
            extra_middle_trim_bad_side: 100,
            min_split_read_size: 1000,
        }
    }
}

fn check_percent(name: &str, v: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&v) {
        return Err(CleaverError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("{} is outside 0 to 100", v),
        });
    }
    Ok(())
}

impl TrimOpts {
    /// Reject out-of-range and conflicting values, and apply implied settings
    /// (binning always discards reads with middle adapters).
    pub fn validate(mut self) -> Result<Self> {
        if self.threads == 0 {
            return Err(CleaverError::InvalidParameter {
                parameter: "threads".to_string(),
                reason: "at least one thread required".to_string(),
            });
        }
        if self.barcode_dir.is_some() && self.output.is_some() {
            return Err(CleaverError::InvalidParameter {
                parameter: "output".to_string(),
                reason: "only one of --output and --barcode_dir may be used".to_string(),
            });
        }
        if self.untrimmed && self.barcode_dir.is_none() {
            return Err(CleaverError::InvalidParameter {
                parameter: "untrimmed".to_string(),
                reason: "--untrimmed requires --barcode_dir".to_string(),
            });
        }
        if self.end_size == 0 {
            return Err(CleaverError::InvalidParameter {
                parameter: "end_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        check_percent("adapter_threshold", self.adapter_threshold)?;
        check_percent("end_threshold", self.end_threshold)?;
        check_percent("middle_threshold", self.middle_threshold)?;
        check_percent("barcode_threshold", self.barcode_threshold)?;
        if self.barcode_dir.is_some() {
            self.discard_middle = true;
        }
        Ok(self)
    }

    pub fn barcode_binning(&self) -> bool { self.barcode_dir.is_some() }

    pub fn discovery_params(&self) -> DiscoveryParams {
        DiscoveryParams {
            end_size: self.end_size,
            adapter_threshold: self.adapter_threshold,
            scoring: self.scoring,
            barcode_binning: self.barcode_binning(),
        }
    }

    pub fn end_trim_params(&self, orientation: Option<BarcodeOrientation>) -> EndTrimParams {
        EndTrimParams {
            end_size: self.end_size,
            extra_trim: self.extra_end_trim,
            end_threshold: self.end_threshold,
            min_trim_size: self.min_trim_size,
            scoring: self.scoring,
            barcode_orientation: orientation,
        }
    }

    pub fn barcode_params(&self) -> BarcodeParams {
        BarcodeParams {
            threshold: self.barcode_threshold,
            diff: self.barcode_diff,
            require_two_barcodes: self.require_two_barcodes,
        }
    }

    pub fn middle_params(&self) -> MiddleParams {
        MiddleParams {
            middle_threshold: self.middle_threshold,
            good_side_trim: self.extra_middle_trim_good_side,
            bad_side_trim: self.extra_middle_trim_bad_side,
            scoring: self.scoring,
        }
    }
}
