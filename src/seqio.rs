//! Read input and trimmed-read output.
//!
//! ### Input
//! FASTA / FASTQ, plain or gzipped, parsed with `needletail`. All reads are loaded into
//! memory: discovery samples them first, then every read is processed.
//!
//! ### Output
//! - a single stream (stdout or a file; `.gz` paths are compressed with `flate2`);
//! - or one gzipped file per barcode bin (`BC01.fastq.gz`, ..., `none.fastq.gz`).
//!
//! FASTA sequences are wrapped at 70 columns; FASTQ records are written on four lines.
//!
//! ### Errors
//! Parsing/IO errors are bubbled via `anyhow::Result` to the caller.
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use needletail::parse_fastx_file;

use crate::config::OutputFormat;
use crate::read::{Fragment, Read};

/// FASTA line width.
pub const FASTA_WIDTH: usize = 70;

/// Concrete sequence format of input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqFormat { Fasta, Fastq }

impl SeqFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SeqFormat::Fasta => "fasta",
            SeqFormat::Fastq => "fastq",
        }
    }
}

/// Reads from one or more files, in input order.
#[derive(Debug)]
pub struct LoadedReads {
    pub reads: Vec<Read>,
    /// Number of reads contributed by each input file.
    pub per_file: Vec<usize>,
    /// FASTQ if any record carried qualities, else FASTA.
    pub format: SeqFormat,
}

/// Parse every record of every input file.
pub fn load_reads(paths: &[PathBuf]) -> Result<LoadedReads> {
    if paths.is_empty() {
        bail!("no input files given");
    }
    let mut reads = Vec::new();
    let mut per_file = Vec::with_capacity(paths.len());
    let mut format = SeqFormat::Fasta;
    for p in paths {
        if !p.is_file() {
            bail!("input file does not exist: {}", p.display());
        }
        let mut reader = parse_fastx_file(p).with_context(|| format!("failed to open {}", p.display()))?;
        let before = reads.len();
        while let Some(record) = reader.next() {
            let rec = record.with_context(|| format!("failed to parse {}", p.display()))?;
            let name = String::from_utf8_lossy(rec.id()).to_string();
            let qual = rec.qual().map(|q| q.to_vec()).unwrap_or_default();
            if rec.qual().is_some() {
                format = SeqFormat::Fastq;
            }
            reads.push(Read::new(name, &rec.seq(), &qual));
        }
        info!("Loaded {} reads from {}", reads.len() - before, p.display());
        per_file.push(reads.len() - before);
    }
    Ok(LoadedReads { reads, per_file, format })
}

/// Indices (into the concatenated read list) of the discovery sample.
///
/// With one file this is the first `check_reads` reads. With several, each file contributes
/// its first reads in proportion to its size, so a small first file cannot starve the rest.
pub fn sample_indices(per_file: &[usize], check_reads: usize) -> Vec<usize> {
    let total: usize = per_file.iter().sum();
    if total <= check_reads {
        return (0..total).collect();
    }
    let mut out = Vec::with_capacity(check_reads);
    let mut offset = 0;
    for &n in per_file {
        let quota = ((n as f64 / total as f64) * check_reads as f64).round() as usize;
        out.extend(offset..offset + quota.min(n));
        offset += n;
    }
    out.truncate(check_reads);
    out
}

/// `barcode01` / `BC1` / `bc01` → `BC01`; `unclassified` → `none`; anything else unchanged.
pub fn normalize_label(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    if lower == "unclassified" || lower == "none" {
        return "none".to_string();
    }
    let digits = lower.strip_prefix("barcode").or_else(|| lower.strip_prefix("bc"));
    if let Some(d) = digits {
        if let Ok(n) = d.parse::<u32>() {
            return format!("BC{:02}", n);
        }
    }
    raw.trim().to_string()
}

/// Load reference labels (`read_id`, `label`) from CSV, or TSV by `.tsv` extension.
/// The first row is a header.
pub fn load_reference_labels<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let p = path.as_ref();
    let delim = if p.extension().map(|e| e == "tsv").unwrap_or(false) { b'\t' } else { b',' };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delim)
        .from_path(p)
        .with_context(|| format!("failed to open barcode labels {}", p.display()))?;
    let mut map = HashMap::new();
    for rec in rdr.records() {
        let r = rec?;
        if r.len() >= 2 {
            let id = r[0].split_whitespace().next().unwrap_or("").to_string();
            map.insert(id, normalize_label(&r[1]));
        }
    }
    Ok(map)
}

/// Concrete output format: explicit choice, else the output file name, else the input format.
pub fn resolve_output_format(requested: OutputFormat, output: Option<&Path>, input: SeqFormat) -> SeqFormat {
    match requested {
        OutputFormat::Fasta => SeqFormat::Fasta,
        OutputFormat::Fastq => SeqFormat::Fastq,
        OutputFormat::Auto => {
            let name = output.map(|p| p.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
            if name.contains(".fasta") || name.contains(".fa.") || name.ends_with(".fa") {
                SeqFormat::Fasta
            } else if name.contains(".fastq") || name.contains(".fq.") || name.ends_with(".fq") {
                SeqFormat::Fastq
            } else {
                input
            }
        }
    }
}

pub fn write_fastq_record<W: Write>(w: &mut W, id: &str, seq: &[u8], qual: &[u8]) -> io::Result<()> {
    w.write_all(b"@")?;
    w.write_all(id.as_bytes())?;
    w.write_all(b"\n")?;
    w.write_all(seq)?;
    w.write_all(b"\n+\n")?;
    w.write_all(qual)?;
    w.write_all(b"\n")?;
    Ok(())
}

pub fn write_fasta_record<W: Write>(w: &mut W, id: &str, seq: &[u8]) -> io::Result<()> {
    w.write_all(b">")?;
    w.write_all(id.as_bytes())?;
    w.write_all(b"\n")?;
    for line in seq.chunks(FASTA_WIDTH) {
        w.write_all(line)?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

pub fn write_fragment<W: Write>(w: &mut W, frag: &Fragment, format: SeqFormat) -> io::Result<()> {
    match format {
        SeqFormat::Fasta => write_fasta_record(w, &frag.name, &frag.seq),
        SeqFormat::Fastq => write_fastq_record(w, &frag.name, &frag.seq, &frag.quals),
    }
}

/// Stdout, or a file (gzipped when the path ends in `.gz`).
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(p) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };
    let fh = File::create(p).with_context(|| format!("failed to create {}", p.display()))?;
    let writer = BufWriter::new(fh);
    if p.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(GzEncoder::new(writer, Compression::default())))
    } else {
        Ok(Box::new(writer))
    }
}

/// Reads and bases written to one barcode bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinSummary {
    pub label: String,
    pub reads: usize,
    pub bases: usize,
    pub path: PathBuf,
}

/// One gzipped output file per barcode label, opened lazily.
pub struct BinWriter {
    dir: PathBuf,
    format: SeqFormat,
    bins: BTreeMap<String, (GzEncoder<BufWriter<File>>, usize, usize)>,
}

impl BinWriter {
    pub fn new<P: AsRef<Path>>(dir: P, format: SeqFormat) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(Self { dir, format, bins: BTreeMap::new() })
    }

    fn bin_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.gz", label, self.format.extension()))
    }

    /// Write `frags` to the bin for `label` (`None` goes to `none`).
    pub fn write(&mut self, label: Option<&str>, frags: &[Fragment]) -> Result<()> {
        if frags.is_empty() {
            return Ok(());
        }
        let label = label.unwrap_or("none");
        if !self.bins.contains_key(label) {
            let path = self.bin_path(label);
            let fh = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
            let gz = GzEncoder::new(BufWriter::new(fh), Compression::default());
            self.bins.insert(label.to_string(), (gz, 0, 0));
        }
        if let Some((w, reads, bases)) = self.bins.get_mut(label) {
            for f in frags {
                write_fragment(w, f, self.format)?;
                *reads += 1;
                *bases += f.seq.len();
            }
        }
        Ok(())
    }

    /// Flush and close every bin, returning per-bin totals sorted by label.
    pub fn finish(self) -> Result<Vec<BinSummary>> {
        let mut out = Vec::with_capacity(self.bins.len());
        for (label, (gz, reads, bases)) in self.bins {
            let path = self.dir.join(format!("{}.{}.gz", label, self.format.extension()));
            gz.finish()?.flush()?;
            out.push(BinSummary { label, reads, bases, path });
        }
        Ok(out)
    }
}
