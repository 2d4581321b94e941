use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use cleaver::catalog::AdapterCatalog;
use cleaver::config::{default_threads, OutputFormat, ScoringScheme, TrimOpts};
use cleaver::{pipeline, report};

/// Cleaver CLI
#[derive(Parser)]
#[command(name = "cleaver")]
#[command(version)]
#[command(about = "Trim and split Oxford Nanopore adapters, and bin reads by barcode", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trim adapters from reads (and optionally bin by barcode)
    Trim(TrimArgs),

    /// List every adapter set that is searched for
    ListAdapters,

    /// Show the sequences of one adapter set (e.g. "SQK-LSK114")
    Describe {
        /// Adapter set name
        name: String,
    },
}

#[derive(Args)]
struct TrimArgs {
    /// Input reads (FASTA/FASTQ, optionally gzipped); repeat for several files
    #[arg(short = 'i', long = "input", required = true)]
    inputs: Vec<PathBuf>,
    /// Output file (gzipped if it ends in .gz); stdout when absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Output format
    #[arg(long, default_value = "auto")]
    format: OutputFormat,
    /// Worker threads
    #[arg(short = 't', long, default_value_t = default_threads())]
    threads: usize,
    /// 0 = warnings only, 1 = summaries, 2 = per-read detail, 3 = alignment trace
    #[arg(short = 'v', long, default_value_t = 1)]
    verbosity: u8,

    /// Bin reads into one file per barcode in this directory
    #[arg(short = 'b', long = "barcode_dir")]
    barcode_dir: Option<PathBuf>,
    /// CSV/TSV of read_id,label; reads whose label disagrees with the call are unassigned
    #[arg(long = "barcode_labels")]
    barcode_labels: Option<PathBuf>,
    /// Minimum barcode identity for a call
    #[arg(long = "barcode_threshold", default_value_t = 75.0)]
    barcode_threshold: f64,
    /// Minimum identity lead of the best barcode over the second best
    #[arg(long = "barcode_diff", default_value_t = 5.0)]
    barcode_diff: f64,
    /// Require the same barcode at both ends
    #[arg(long = "require_two_barcodes")]
    require_two_barcodes: bool,
    /// Bin reads without trimming them
    #[arg(long)]
    untrimmed: bool,
    /// Do not write reads without a barcode call
    #[arg(long = "discard_unassigned")]
    discard_unassigned: bool,

    /// Identity an adapter set must reach in discovery to be used
    #[arg(long = "adapter_threshold", default_value_t = 90.0)]
    adapter_threshold: f64,
    /// Number of reads sampled for discovery
    #[arg(long = "check_reads", default_value_t = 10_000)]
    check_reads: usize,
    /// match,mismatch,gap_open,gap_extend
    #[arg(long = "scoring_scheme", default_value = "3,-6,-5,-2")]
    scoring_scheme: ScoringScheme,

    /// Bases at each read end searched for adapters
    #[arg(long = "end_size", default_value_t = 100)]
    end_size: usize,
    /// Shortest adapter alignment that trims a read end
    #[arg(long = "min_trim_size", default_value_t = 4)]
    min_trim_size: usize,
    /// Extra bases trimmed beyond an end adapter
    #[arg(long = "extra_end_trim", default_value_t = 2)]
    extra_end_trim: usize,
    /// Aligned identity required to trim an end adapter
    #[arg(long = "end_threshold", default_value_t = 75.0)]
    end_threshold: f64,

    /// Do not look for middle adapters
    #[arg(long = "no_split")]
    no_split: bool,
    /// Drop reads with middle adapters instead of splitting them
    #[arg(long = "discard_middle")]
    discard_middle: bool,
    /// Full-length identity required for a middle adapter
    #[arg(long = "middle_threshold", default_value_t = 85.0)]
    middle_threshold: f64,
    /// Bases trimmed on the side of a middle adapter facing its own read
    #[arg(long = "extra_middle_trim_good_side", default_value_t = 10)]
    extra_middle_trim_good_side: usize,
    /// Bases trimmed on the side of a middle adapter facing the joined read
    #[arg(long = "extra_middle_trim_bad_side", default_value_t = 100)]
    extra_middle_trim_bad_side: usize,
    /// Split pieces shorter than this are dropped
    #[arg(long = "min_split_read_size", default_value_t = 1000)]
    min_split_read_size: usize,
}

impl From<TrimArgs> for TrimOpts {
    fn from(a: TrimArgs) -> Self {
        TrimOpts {
            inputs: a.inputs,
            output: a.output,
            format: a.format,
            threads: a.threads,
            verbosity: a.verbosity,
            barcode_dir: a.barcode_dir,
            barcode_labels: a.barcode_labels,
            barcode_threshold: a.barcode_threshold,
            barcode_diff: a.barcode_diff,
            require_two_barcodes: a.require_two_barcodes,
            untrimmed: a.untrimmed,
            discard_unassigned: a.discard_unassigned,
            adapter_threshold: a.adapter_threshold,
            check_reads: a.check_reads,
            scoring: a.scoring_scheme,
            end_size: a.end_size,
            min_trim_size: a.min_trim_size,
            extra_end_trim: a.extra_end_trim,
            end_threshold: a.end_threshold,
            no_split: a.no_split,
            discard_middle: a.discard_middle,
            middle_threshold: a.middle_threshold,
            extra_middle_trim_good_side: a.extra_middle_trim_good_side,
            extra_middle_trim_bad_side: a.extra_middle_trim_bad_side,
            min_split_read_size: a.min_split_read_size,
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Environment is only touched here, before any worker threads exist.
    report::configure_display();

    match cli.command {
        Commands::Trim(args) => {
            init_logging(args.verbosity);
            let opts = TrimOpts::from(args).validate()?;
            log::info!("cleaver {}", cleaver::VERSION);
            let summary = pipeline::run(&opts)?;
            log::info!("{} records written", summary.records_written);
        }

        Commands::ListAdapters => {
            cmd_list_adapters()?;
        }

        Commands::Describe { name } => {
            cmd_describe(&name)?;
        }
    }

    Ok(())
}

fn cmd_list_adapters() -> Result<()> {
    let df = report::catalog_table(&AdapterCatalog::standard())?;
    println!("{}", df);
    Ok(())
}

fn cmd_describe(name: &str) -> Result<()> {
    let catalog = AdapterCatalog::standard();
    let Some(set) = catalog.find(name) else {
        anyhow::bail!("Unknown adapter set: {}", name);
    };
    println!("name: {}", set.name);
    println!("role: {:?}", set.role);
    for (end, seq) in [("start", &set.start), ("end", &set.end)] {
        match seq {
            Some(s) => println!("{}: {} {}", end, s.name, s.sequence),
            None => println!("{}: -", end),
        }
    }
    Ok(())
}
