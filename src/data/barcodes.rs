//! Barcode cores (BC01–BC12) and the fixed flanks used to synthesize full barcode context.
//!
//! Each core is searched for in both strand conventions: a *forward* set has the core at
//! the read start and its reverse complement at the read end, a *reverse* set the opposite.
//! The catalog builds both sets from every row of [`BARCODES`].
//!
//! Full-context flanks:
//! - native: `NATIVE_START_5 + core_rev + NATIVE_START_3` at the start and
//!   `NATIVE_END_5 + core + NATIVE_END_3` at the end;
//! - rapid: `upstream + core + RAPID_3` at the start only, where the upstream fragment
//!   depends on which rapid kit generation was found.

/// `(core name, core, reverse-complement name, reverse complement)`.
pub type BarcodeRow = (&'static str, &'static str, &'static str, &'static str);

/// PCR / native barcode cores 1–12.
pub const BARCODES: &[BarcodeRow] = &[
    ("BC01", "AAGAAAGTTGTCGGTGTCTTTGTG", "BC01_rev", "CACAAAGACACCGACAACTTTCTT"),
    ("BC02", "TCGATTCCGTTTGTAGTCGTCTGT", "BC02_rev", "ACAGACGACTACAAACGGAATCGA"),
    ("BC03", "GAGTCTTGTGTCCCAGTTACCAGG", "BC03_rev", "CCTGGTAACTGGGACACAAGACTC"),
    ("BC04", "TTCGGATTCTATCGTGTTTCCCTA", "BC04_rev", "TAGGGAAACACGATAGAATCCGAA"),
    ("BC05", "CTTGTCCAGGGTTTGTGTAACCTT", "BC05_rev", "AAGGTTACACAAACCCTGGACAAG"),
    ("BC06", "TTCTCGCAAAGGCAGAAAGTAGTC", "BC06_rev", "GACTACTTTCTGCCTTTGCGAGAA"),
    ("BC07", "GTGTTACCGTGGGAATGAATCCTT", "BC07_rev", "AAGGATTCATTCCCACGGTAACAC"),
    ("BC08", "TTCAGGGAACAAACCAAGTTACGT", "BC08_rev", "ACGTAACTTGGTTTGTTCCCTGAA"),
    ("BC09", "AACTAGGCACAGCGAGTCTTGGTT", "BC09_rev", "AACCAAGACTCGCTGTGCCTAGTT"),
    ("BC10", "AAGCGTTGAAACCTTTGTCCTCTC", "BC10_rev", "GAGAGGACAAAGGTTTCAACGCTT"),
    ("BC11", "GTTTCATCTATCGGAGGGAATGGA", "BC11_rev", "TCCATTCCCTCCGATAGATGAAAC"),
    ("BC12", "CAGGTAGAAAGAAGCAGAATCGGA", "BC12_rev", "TCCGATTCTGCTTCTTTCTACCTG"),
];

/// Ligation trunk and linker upstream of the reverse-complemented core (native, start).
pub const NATIVE_START_5: &str = "AATGTACTTCGTTCAGTTACGTATTGCTAAGGTTAA";
/// Linker downstream of the core (native, start).
pub const NATIVE_START_3: &str = "CAGCACCT";
/// Linker upstream of the core (native, end).
pub const NATIVE_END_5: &str = "AGGTGCTG";
/// Linker and ligation trunk downstream of the core (native, end).
pub const NATIVE_END_3: &str = "TTAACCTTAGCAATACGTAACTGAACGAAGT";

/// Upstream fragment for first-generation rapid barcodes (ligation trunk + linker).
pub const RAPID_OLD_5: &str = "AATGTACTTCGTTCAGTTACGTATTGCTGCTTGGGTGTTTAACC";
/// Upstream fragment for RBK004 rapid barcodes.
pub const RAPID_NEW_5: &str = "AATGTACTTCGTTCAGTTACGGCTTGGGTGTTTAACC";
/// Rapid adapter downstream of the core.
pub const RAPID_3: &str = "GTTTTCGCATTTATCGTGAAACGCTTTCGCGTTTTTCGTGCGCCGCTTCA";
