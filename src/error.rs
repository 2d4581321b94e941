//! Error types for the decision engine.
//!
//! I/O and CLI layers use `anyhow::Result`; the core reports its few fatal conditions
//! through [`CleaverError`] so callers can match on them.
use thiserror::Error;

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CleaverError>;

/// Fatal conditions raised by the core.
#[derive(Error, Debug)]
pub enum CleaverError {
    /// Barcode binning was requested but no barcode set cleared the adapter threshold.
    #[error("no barcodes were found in the sampled reads (best barcode identity {best:.1}% < {threshold:.1}%)")]
    NoBarcodeSignal {
        /// Highest identity observed for any barcode set.
        best: f64,
        /// Adapter threshold in force.
        threshold: f64,
    },

    /// Scoring scheme string could not be parsed or has invalid signs.
    #[error("invalid scoring scheme '{scheme}': {reason}")]
    InvalidScoringScheme {
        /// The offending input.
        scheme: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A configuration value is out of range or conflicts with another.
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        parameter: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn no_barcode_signal_message_has_scores() {
        let e = CleaverError::NoBarcodeSignal { best: 61.25, threshold: 90.0 };
        let msg = e.to_string();
        assert!(msg.contains("61.2") || msg.contains("61.3"));
        assert!(msg.contains("90.0%"));
    }

    #[test]
    fn invalid_parameter_names_the_parameter() {
        let e = CleaverError::InvalidParameter {
            parameter: "threads".to_string(),
            reason: "at least one thread required".to_string(),
        };
        assert!(e.to_string().contains("'threads'"));
    }
}
