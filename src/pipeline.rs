//! End-to-end run: load, discover, trim, call barcodes, split, write.
//!
//! [`process_reads`] holds the decision stages and does no I/O, so it can be driven with
//! any [`AlignmentOracle`]. [`run`] wraps it with input parsing, a local rayon pool and
//! output writing.
use std::io::Write;

use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::adapter::AdapterSet;
use crate::align::{AlignmentOracle, BioOracle};
use crate::barcode::call_barcode;
use crate::catalog::{add_full_barcode_sets, AdapterCatalog};
use crate::config::TrimOpts;
use crate::discover::{discover_adapter_sets, Discovery};
use crate::middle::{find_middle_adapters, MiddleAdapters};
use crate::read::{Fragment, Read};
use crate::report;
use crate::seqio::{self, BinSummary, BinWriter};
use crate::trim::trim_read_ends;

/// Counts reported after end trimming and middle splitting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrimSummary {
    pub reads: usize,
    pub start_trimmed: usize,
    pub start_bases: usize,
    pub end_trimmed: usize,
    pub end_bases: usize,
    pub middle: usize,
}

impl TrimSummary {
    pub fn from_reads(reads: &[Read]) -> Self {
        let mut s = Self { reads: reads.len(), ..Self::default() };
        for r in reads {
            let (start, end) = r.trimmed_bounds();
            if start > 0 {
                s.start_trimmed += 1;
                s.start_bases += start;
            }
            if end < r.len() {
                s.end_trimmed += 1;
                s.end_bases += r.len() - end;
            }
            if r.has_middle_adapters() {
                s.middle += 1;
            }
        }
        s
    }
}

/// What the decision stages found.
#[derive(Debug)]
pub struct Processed {
    pub discovery: Discovery,
    /// Sets used for trimming: the matching sets plus any synthesized full barcodes.
    pub trim_sets: Vec<AdapterSet>,
    pub summary: TrimSummary,
}

/// Run discovery on `reads[sample]`, then trim, call and split every read in place.
///
/// Parallel work runs on the current rayon pool.
pub fn process_reads<O: AlignmentOracle + ?Sized>(
    reads: &mut [Read],
    sample: &[usize],
    catalog: &AdapterCatalog,
    opts: &TrimOpts,
    oracle: &O,
) -> Result<Processed> {
    info!("Looking for known adapter sets");
    let sampled: Vec<Read> = sample.iter().filter_map(|&i| reads.get(i).cloned()).collect();
    let discovery = discover_adapter_sets(&sampled, catalog, &opts.discovery_params(), oracle)?;
    drop(sampled);

    let mut trim_sets = discovery.matching.clone();
    let added = add_full_barcode_sets(&mut trim_sets);
    debug!("added {} full barcode sets", added);
    if trim_sets.is_empty() {
        info!("No adapters found; output reads are unchanged");
        let summary = TrimSummary::from_reads(reads);
        return Ok(Processed { discovery, trim_sets, summary });
    }

    info!("Trimming adapters from read ends");
    for set in &trim_sets {
        for s in set.start.iter().chain(set.end.iter()) {
            info!("  {}: {}", s.name, s.sequence);
        }
    }
    let end_params = opts.end_trim_params(discovery.orientation);
    let barcode_params = opts.barcode_params();
    let binning = opts.barcode_binning();
    reads.par_iter_mut().for_each(|read| {
        trim_read_ends(read, &trim_sets, &end_params, oracle);
        if binning {
            call_barcode(read, &barcode_params);
        }
        debug!("{}", read.end_diagnostic(end_params.end_size));
    });
    let summary = TrimSummary::from_reads(reads);
    info!(
        "{} / {} reads had adapters trimmed from their start ({} bp removed)",
        summary.start_trimmed, summary.reads, summary.start_bases
    );
    info!(
        "{} / {} reads had adapters trimmed from their end ({} bp removed)",
        summary.end_trimmed, summary.reads, summary.end_bases
    );

    if opts.no_split {
        return Ok(Processed { discovery, trim_sets, summary });
    }

    let verb = if opts.discard_middle { "Discarding" } else { "Splitting" };
    info!("{} reads containing middle adapters", verb);
    let middle = MiddleAdapters::from_sets(&trim_sets);
    let middle_params = opts.middle_params();
    reads.par_iter_mut().for_each(|read| {
        if find_middle_adapters(read, &middle, &middle_params, oracle) > 0 {
            debug!("{}\n{}", read.name, read.middle_diagnostic());
        }
    });
    let summary = TrimSummary::from_reads(reads);
    let verb = if opts.discard_middle { "discarded" } else { "split" };
    info!("{} / {} reads were {} based on middle adapters", summary.middle, summary.reads, verb);
    Ok(Processed { discovery, trim_sets, summary })
}

/// Output records for one read under the run's output options.
pub fn render(read: &Read, opts: &TrimOpts) -> Vec<Fragment> {
    if opts.untrimmed {
        if read.has_middle_adapters() && opts.discard_middle {
            return Vec::new();
        }
        return vec![read.untrimmed_fragment()];
    }
    read.fragments(opts.min_split_read_size, opts.discard_middle)
}

/// Totals for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub trim: TrimSummary,
    pub records_written: usize,
    pub bins: Vec<BinSummary>,
}

/// Execute a full run with the default aligner.
pub fn run(opts: &TrimOpts) -> Result<RunSummary> {
    let pool = ThreadPoolBuilder::new().num_threads(opts.threads).build()?;
    info!("Loading reads");
    let loaded = seqio::load_reads(&opts.inputs)?;
    let mut reads = loaded.reads;
    if reads.is_empty() {
        warn!("no reads found in the input");
    }

    if let Some(path) = &opts.barcode_labels {
        let labels = seqio::load_reference_labels(path)?;
        let mut labelled = 0usize;
        for r in reads.iter_mut() {
            if let Some(l) = labels.get(r.id()) {
                r.reference_label = Some(l.clone());
                labelled += 1;
            }
        }
        info!("{} / {} reads have a reference barcode label", labelled, reads.len());
    }

    let catalog = AdapterCatalog::standard();
    let sample = seqio::sample_indices(&loaded.per_file, opts.check_reads);
    let processed = pool.install(|| process_reads(&mut reads, &sample, &catalog, opts, &BioOracle))?;
    info!("\n{}", report::adapter_set_table(&processed.discovery.scored, &processed.discovery.matching)?);

    let format = seqio::resolve_output_format(opts.format, opts.output.as_deref(), loaded.format);
    let mut records_written = 0usize;
    let mut bins = Vec::new();
    if let Some(dir) = &opts.barcode_dir {
        let mut writer = BinWriter::new(dir, format)?;
        for read in &reads {
            if opts.discard_unassigned && read.barcode_call.is_none() {
                continue;
            }
            let frags = render(read, opts);
            records_written += frags.len();
            writer.write(read.barcode_call.as_deref(), &frags)?;
        }
        bins = writer.finish()?;
        info!("Saving trimmed reads to barcode-specific files\n{}", report::bin_table(&bins)?);
    } else {
        let mut out = seqio::open_output(opts.output.as_deref())?;
        for read in &reads {
            for f in render(read, opts) {
                seqio::write_fragment(&mut out, &f, format)?;
                records_written += 1;
            }
        }
        out.flush()?;
        if let Some(p) = &opts.output {
            info!("Saved result to {}", p.display());
        }
    }
    Ok(RunSummary { trim: processed.summary, records_written, bins })
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use crate::align::testing::random_seq;
    use crate::data::barcodes::{NATIVE_END_3, NATIVE_END_5, NATIVE_START_3, NATIVE_START_5};
    use flate2::read::GzDecoder;
    use std::io::Read as _;

    const LA_TOP: &str = "TTTTTTTTCCTGTACTTCGTTCAGTTACGTATTGCT";
    const LA_BOTTOM: &str = "GCAATACGTAACTGAACGAAGTACAGG";
    const BC01: &str = "AAGAAAGTTGTCGGTGTCTTTGTG";
    const BC01_REV: &str = "CACAAAGACACCGACAACTTTCTT";

    fn ligation_read(i: u64, chimeric: bool) -> Read {
        let mut seq = LA_TOP.as_bytes().to_vec();
        seq.extend(random_seq(2_000, 1_000 + i));
        if chimeric {
            seq.extend_from_slice(LA_TOP.as_bytes());
            seq.extend(random_seq(2_000, 5_000 + i));
        }
        seq.extend_from_slice(LA_BOTTOM.as_bytes());
        Read::new(format!("read{} ch=1", i), &seq, b"")
    }

    fn native_bc01_read(i: u64) -> Read {
        let seq = format!(
            "{}{}{}{}{}{}{}",
            NATIVE_START_5,
            BC01_REV,
            NATIVE_START_3,
            String::from_utf8(random_seq(2_000, 9_000 + i)).unwrap(),
            NATIVE_END_5,
            BC01,
            NATIVE_END_3
        );
        Read::new(format!("nb{}", i), seq.as_bytes(), b"")
    }

    #[test]
    fn ligation_adapters_are_trimmed_and_chimeras_split() {
        let mut reads: Vec<Read> = (0..12).map(|i| ligation_read(i, i == 3)).collect();
        let sample: Vec<usize> = (0..reads.len()).collect();
        let opts = TrimOpts { threads: 2, ..TrimOpts::default() };
        let p = process_reads(&mut reads, &sample, &AdapterCatalog::standard(), &opts, &BioOracle).unwrap();

        assert!(p.discovery.matching.iter().any(|s| s.name == "SQK-LSK114"));
        assert!(p.discovery.orientation.is_none());
        assert_eq!(reads[0].start_trim_amount, LA_TOP.len() + 2);
        assert_eq!(reads[0].end_trim_amount, LA_BOTTOM.len() + 2);
        assert_eq!(reads[0].trimmed_len(), 2_000 - 4);
        assert_eq!(p.summary.start_trimmed, 12);
        assert_eq!(p.summary.middle, 1);

        let frags = render(&reads[3], &opts);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].name, "read3_1 ch=1");
        assert_eq!(frags[1].name, "read3_2 ch=1");
        assert!(frags.iter().all(|f| f.seq.len() >= 1_000));
        assert_eq!(render(&reads[0], &opts).len(), 1);

        let discard = TrimOpts { discard_middle: true, ..opts.clone() };
        assert!(render(&reads[3], &discard).is_empty());
    }

    #[test]
    fn no_split_leaves_chimeras_whole() {
        let mut reads: Vec<Read> = (0..4).map(|i| ligation_read(i, true)).collect();
        let opts = TrimOpts { no_split: true, ..TrimOpts::default() };
        let p = process_reads(&mut reads, &[0, 1, 2, 3], &AdapterCatalog::standard(), &opts, &BioOracle).unwrap();
        assert_eq!(p.summary.middle, 0);
        assert_eq!(render(&reads[0], &opts).len(), 1);
    }

    #[test]
    fn native_barcodes_are_called_and_fully_trimmed() {
        let mut reads: Vec<Read> = (0..10).map(native_bc01_read).collect();
        reads[9].reference_label = Some("BC02".to_string());
        let sample: Vec<usize> = (0..reads.len()).collect();
        let opts = TrimOpts { barcode_dir: Some("unused".into()), ..TrimOpts::default() }.validate().unwrap();
        let p = process_reads(&mut reads, &sample, &AdapterCatalog::standard(), &opts, &BioOracle).unwrap();

        assert_eq!(p.discovery.orientation, Some(crate::adapter::BarcodeOrientation::Reverse));
        assert!(p.trim_sets.iter().any(|s| s.name == "Native barcoding 1 (full sequence)"));
        let start_full = NATIVE_START_5.len() + BC01_REV.len() + NATIVE_START_3.len();
        let end_full = NATIVE_END_5.len() + BC01.len() + NATIVE_END_3.len();
        for r in &reads[..9] {
            assert_eq!(r.barcode_call.as_deref(), Some("BC01"));
            assert_eq!(r.start_trim_amount, start_full + 2);
            assert_eq!(r.end_trim_amount, end_full + 2);
        }
        assert_eq!(reads[9].barcode_call, None);
    }

    #[test]
    fn native_barcodes_are_fully_trimmed_without_binning() {
        let mut reads: Vec<Read> = (0..10).map(native_bc01_read).collect();
        let sample: Vec<usize> = (0..reads.len()).collect();
        let opts = TrimOpts::default();
        let p = process_reads(&mut reads, &sample, &AdapterCatalog::standard(), &opts, &BioOracle).unwrap();

        assert!(p.trim_sets.iter().any(|s| s.name == "Native barcoding 1 (full sequence)"));
        let start_full = NATIVE_START_5.len() + BC01_REV.len() + NATIVE_START_3.len();
        let end_full = NATIVE_END_5.len() + BC01.len() + NATIVE_END_3.len();
        for r in &reads {
            assert_eq!(r.start_trim_amount, start_full + 2);
            assert_eq!(r.end_trim_amount, end_full + 2);
            assert_eq!(r.barcode_call, None);
        }
    }

    #[test]
    fn binning_without_barcodes_fails_before_trimming() {
        let mut reads: Vec<Read> = (0..4).map(|i| ligation_read(i, false)).collect();
        let opts = TrimOpts { barcode_dir: Some("unused".into()), ..TrimOpts::default() }.validate().unwrap();
        let err = process_reads(&mut reads, &[0, 1, 2, 3], &AdapterCatalog::standard(), &opts, &BioOracle).unwrap_err();
        assert!(err.to_string().contains("no barcodes"));
        assert_eq!(reads[0].start_trim_amount, 0);
    }

    #[test]
    fn untrimmed_output_keeps_whole_read() {
        let mut reads = vec![native_bc01_read(1)];
        reads[0].start_trim_amount = 70;
        let opts = TrimOpts { barcode_dir: Some("unused".into()), untrimmed: true, ..TrimOpts::default() };
        let frags = render(&reads[0], &opts);
        assert_eq!(frags[0].seq.len(), reads[0].len());
    }

    #[test]
    fn run_writes_trimmed_fastq() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reads.fastq");
        let mut text = String::new();
        for i in 0..6 {
            let r = ligation_read(i, false);
            let seq = String::from_utf8(r.seq.clone()).unwrap();
            text.push_str(&format!("@{}\n{}\n+\n{}\n", r.name, seq, "5".repeat(seq.len())));
        }
        std::fs::write(&input, text).unwrap();
        let output = dir.path().join("trimmed.fastq.gz");
        let opts = TrimOpts {
            inputs: vec![input],
            output: Some(output.clone()),
            threads: 2,
            ..TrimOpts::default()
        }
        .validate()
        .unwrap();
        let summary = run(&opts).unwrap();
        assert_eq!(summary.records_written, 6);

        let mut out = String::new();
        GzDecoder::new(std::fs::File::open(&output).unwrap()).read_to_string(&mut out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[0], "@read0 ch=1");
        assert_eq!(lines[1].len(), 2_000 - 4);
        assert_eq!(lines[3].len(), lines[1].len());
    }

    #[test]
    fn run_bins_reads_by_barcode() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reads.fasta");
        let mut text = String::new();
        for i in 0..6 {
            let r = native_bc01_read(i);
            text.push_str(&format!(">{}\n{}\n", r.name, String::from_utf8(r.seq.clone()).unwrap()));
        }
        std::fs::write(&input, text).unwrap();
        let bins_dir = dir.path().join("bins");
        let opts = TrimOpts {
            inputs: vec![input],
            barcode_dir: Some(bins_dir.clone()),
            threads: 2,
            ..TrimOpts::default()
        }
        .validate()
        .unwrap();
        let summary = run(&opts).unwrap();
        assert_eq!(summary.bins.len(), 1);
        assert_eq!(summary.bins[0].label, "BC01");
        assert_eq!(summary.bins[0].reads, 6);
        let mut out = String::new();
        GzDecoder::new(std::fs::File::open(bins_dir.join("BC01.fasta.gz")).unwrap())
            .read_to_string(&mut out)
            .unwrap();
        assert!(out.starts_with(">nb0\n"));
    }
}
