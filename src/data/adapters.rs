//! Adapter sets for **ligation**, **rapid** and **PCR** chemistries.
//!
//! Start sequences are searched for in the first bases of each read and end sequences in
//! the last bases. Rapid adapters have no end sequence: transposase chemistry leaves
//! nothing on the 3′ end.
//!
//! Notes:
//! - Sequences are uppercase DNA. Wobble bases are not used here; the aligner treats any
//!   non-ACGT byte as a mismatch.
//! - `SQK-LSK114` uses the Kit 14 LA adapter, which shares its trunk with `SQK-NSK007`.

use crate::adapter::{AdapterRole, Provenance, SetRecord};

const CHTD_A15: Provenance = Provenance {
    source: "https://nanoporetech.com/document/chemistry-technical-document",
    reference: "Appendix 15: Adapter sequences",
};

const COMMUNITY: Provenance = Provenance {
    source: "Community adapter lists for R9 ligation, rapid and PCR kits",
    reference: "Y-adapter trunk and rapid adapter fragments",
};

/// Ligation Sequencing Kit V14 (LA top / LA bottom).
pub const LSK114: SetRecord = SetRecord {
    name: "SQK-LSK114",
    role: AdapterRole::Ligation,
    start: Some(("LA_top", "TTTTTTTTCCTGTACTTCGTTCAGTTACGTATTGCT")),
    end: Some(("LA_bottom", "GCAATACGTAACTGAACGAAGTACAGG")),
    provenance: CHTD_A15,
};

/// R9 ligation Y-adapter trunk (SQK-NSK007/LSK108/LSK109).
pub const NSK007: SetRecord = SetRecord {
    name: "SQK-NSK007",
    role: AdapterRole::Ligation,
    start: Some(("SQK-NSK007_Y_Top", "AATGTACTTCGTTCAGTTACGTATTGCT")),
    end: Some(("SQK-NSK007_Y_Bottom", "GCAATACGTAACTGAACGAAGT")),
    provenance: COMMUNITY,
};

/// Rapid adapter (start only).
pub const RAPID: SetRecord = SetRecord {
    name: "Rapid",
    role: AdapterRole::Rapid,
    start: Some(("Rapid_adapter", "GTTTTCGCATTTATCGTGAAACGCTTTCGCGTTTTTCGTGCGCCGCTTCA")),
    end: None,
    provenance: COMMUNITY,
};

/// Upstream fragment of the RBK004 rapid barcode adapter (start only).
pub const RBK004_UPSTREAM: SetRecord = SetRecord {
    name: "RBK004_upstream",
    role: AdapterRole::Rapid,
    start: Some(("RBK004_upstream", "AATGTACTTCGTTCAGTTACGGCTTGGGTGTTTAACC")),
    end: None,
    provenance: COMMUNITY,
};

/// PCR adapters built on the VN primer.
pub const PCR_1: SetRecord = SetRecord {
    name: "PCR adapters 1",
    role: AdapterRole::Ligation,
    start: Some(("PCR_1_start", "ACTTGCCTGTCGCTCTATCTTC")),
    end: Some(("PCR_1_end", "GAAGATAGAGCGACAGGCAAGT")),
    provenance: COMMUNITY,
};

/// PCR adapters built on the strand-switching primer.
pub const PCR_2: SetRecord = SetRecord {
    name: "PCR adapters 2",
    role: AdapterRole::Ligation,
    start: Some(("PCR_2_start", "TTTCTGTTGGTGCTGATATTGC")),
    end: Some(("PCR_2_end", "GCAATATCAGCACCAACAGAAA")),
    provenance: COMMUNITY,
};

/// VN primer variant with one extra leading base.
pub const PCR_3: SetRecord = SetRecord {
    name: "PCR adapters 3",
    role: AdapterRole::Ligation,
    start: Some(("PCR_3_start", "TACTTGCCTGTCGCTCTATCTTC")),
    end: Some(("PCR_3_end", "GAAGATAGAGCGACAGGCAAGTA")),
    provenance: COMMUNITY,
};

/// Convenience: all current adapter sets in search order.
pub const ADAPTER_SETS: &[SetRecord] = &[
    NSK007, LSK114, RAPID, RBK004_UPSTREAM, PCR_1, PCR_2, PCR_3,
];
