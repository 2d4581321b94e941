#![forbid(unsafe_code)]
//! # cleaver
//!
//! Finds Oxford Nanopore **adapters** in long reads, trims them from read ends, splits
//! reads that contain an adapter in the middle, and assigns reads to **barcodes**.
//!
//! ## Stages
//! 1. **Discovery** ([`discover`]): a sample of reads is scored against every adapter set
//!    in the [`catalog`] to learn which chemistries are present.
//! 2. **End trimming** ([`trim`]): the matching sets are aligned against each read's ends.
//! 3. **Barcode calling** ([`barcode`]): per-end barcode identities become one call.
//! 4. **Middle splitting** ([`middle`]): internal adapters mark where chimeric reads are cut.
//!
//! All alignment goes through the [`align::AlignmentOracle`] trait; [`align::BioOracle`] is
//! the default implementation. [`pipeline`] wires the stages to file input and output.
//!
//! ## Example
//! ```rust
//! use cleaver::{align::BioOracle, catalog::AdapterCatalog, config::TrimOpts, read::Read, trim::find_start_trim};
//!
//! let catalog = AdapterCatalog::standard();
//! let lsk114 = catalog.find("SQK-LSK114").unwrap().clone();
//! let mut read = Read::new("r1", b"TTTTTTTTCCTGTACTTCGTTCAGTTACGTATTGCTGATTACAGATTACAGATTACA", b"");
//! find_start_trim(&mut read, &[lsk114], &TrimOpts::default().end_trim_params(None), &BioOracle);
//! // 36 bp adapter plus 2 bp of extra trim
//! assert_eq!(read.start_trim_amount, 38);
//! ```

pub mod adapter;
pub mod align;
pub mod barcode;
pub mod catalog;
pub mod config;
pub mod data { pub mod adapters; pub mod barcodes; pub mod legacy; }
pub mod discover;
pub mod error;
pub mod middle;
pub mod pipeline;
pub mod read;
pub mod report;
pub mod seqio;
pub mod trim;

pub use adapter::{AdapterRole, AdapterSequence, AdapterSet, BarcodeOrientation};
pub use align::{AlignmentOracle, AlignmentResult, BioOracle};
pub use config::{ScoringScheme, TrimOpts};
pub use error::{CleaverError, Result};
pub use read::Read;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
