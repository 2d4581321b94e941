//! Tabular reports, built as `polars` DataFrames.
//!
//! The tables go to the log (stderr) rather than stdout, which may be carrying reads.
use polars::prelude::*;

use crate::adapter::{AdapterRole, AdapterSequence, AdapterSet};
use crate::catalog::AdapterCatalog;
use crate::seqio::BinSummary;

/// Show every row and column, untruncated.
///
/// Sets process environment variables, so call it once at startup before any thread pool
/// is built.
pub fn configure_display() {
    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
    std::env::set_var("POLARS_FMT_STR_LEN", "100000");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");
}

fn role_name(role: &AdapterRole) -> String {
    match role {
        AdapterRole::Ligation => "ligation".to_string(),
        AdapterRole::Rapid => "rapid".to_string(),
        AdapterRole::Barcode { orientation, .. } => format!("barcode ({})", orientation),
        AdapterRole::Synthesized { .. } => "full barcode".to_string(),
    }
}

/// Every scored set with its best identities, and whether it was kept.
pub fn adapter_set_table(scored: &[AdapterSet], matching: &[AdapterSet]) -> PolarsResult<DataFrame> {
    let kept: Vec<bool> = scored.iter().map(|s| matching.iter().any(|m| m.name == s.name)).collect();
    df!(
        "set"        => scored.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
        "start_id"   => scored.iter().map(|s| s.best_start_score).collect::<Vec<_>>(),
        "end_id"     => scored.iter().map(|s| s.best_end_score).collect::<Vec<_>>(),
        "best_id"    => scored.iter().map(|s| s.best_score()).collect::<Vec<_>>(),
        "matched"    => kept,
    )
}

/// The adapter sets a catalog searches for.
pub fn catalog_table(catalog: &AdapterCatalog) -> PolarsResult<DataFrame> {
    let sets = catalog.entries();
    let seq = |s: Option<&AdapterSequence>| s.map(|a| a.sequence.clone()).unwrap_or_default();
    df!(
        "set"   => sets.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
        "role"  => sets.iter().map(|s| role_name(&s.role)).collect::<Vec<_>>(),
        "start" => sets.iter().map(|s| seq(s.start.as_ref())).collect::<Vec<_>>(),
        "end"   => sets.iter().map(|s| seq(s.end.as_ref())).collect::<Vec<_>>(),
    )
}

/// One row per barcode bin file.
pub fn bin_table(bins: &[BinSummary]) -> PolarsResult<DataFrame> {
    df!(
        "barcode" => bins.iter().map(|b| b.label.clone()).collect::<Vec<_>>(),
        "reads"   => bins.iter().map(|b| b.reads as u64).collect::<Vec<_>>(),
        "bases"   => bins.iter().map(|b| b.bases as u64).collect::<Vec<_>>(),
        "file"    => bins.iter().map(|b| b.path.display().to_string()).collect::<Vec<_>>(),
    )
}
