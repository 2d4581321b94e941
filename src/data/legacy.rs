//! Legacy adapter sets for historic R7/R9 data (MAP006 and 1D^2 kits).
//!
//! The two 1D^2 sets overlap with the ligation trunk: `1D^2 part 2` begins with the same
//! bases as `SQK-NSK007_Y_Top`. Discovery resolves that overlap (see `crate::discover`).
use crate::adapter::{AdapterRole, Provenance, SetRecord};

const LEGACY_LISTS: Provenance = Provenance {
    source: "Community adapter lists for legacy ONT kits",
    reference: "MAP006 Y-adapters and LSK308 1D^2 fragments",
};

/// MAP006 Y-adapter.
pub const MAP006: SetRecord = SetRecord {
    name: "SQK-MAP006",
    role: AdapterRole::Ligation,
    start: Some(("SQK-MAP006_Y_Top_SK63", "GGTTGTTTCTGTTGGTGCTGATATTGCT")),
    end: Some(("SQK-MAP006_Y_Bottom_SK64", "GCAATATCAGCACCAACAGAAA")),
    provenance: LEGACY_LISTS,
};

/// MAP006 short Y-adapter.
pub const MAP006_SHORT: SetRecord = SetRecord {
    name: "SQK-MAP006 short",
    role: AdapterRole::Ligation,
    start: Some(("SQK-MAP006_Short_Y_Top_LI32", "CGGCGTCTGCTTGGGTGTTTAACCT")),
    end: Some(("SQK-MAP006_Short_Y_Bottom_LI33", "GGTTAAACACCCAAGCAGACGCCG")),
    provenance: LEGACY_LISTS,
};

/// 1D^2 linker, first part.
pub const ONE_D2_PART_1: SetRecord = SetRecord {
    name: "1D^2 part 1",
    role: AdapterRole::Ligation,
    start: Some(("1D2_part_1_start", "GAGAGGTTCCAAGTCAGAGAGGTTCCT")),
    end: Some(("1D2_part_1_end", "AGGAACCTCTCTGACTTGGAACCTCTC")),
    provenance: LEGACY_LISTS,
};

/// 1D^2 linker, second part.
pub const ONE_D2_PART_2: SetRecord = SetRecord {
    name: "1D^2 part 2",
    role: AdapterRole::Ligation,
    start: Some(("1D2_part_2_start", "CTTCGTTCAGTTACGTATTGCTGGCGTCTGCTT")),
    end: Some(("1D2_part_2_end", "CACCCAAGCAGACGCCAGCAATACGTAACT")),
    provenance: LEGACY_LISTS,
};

/// Group of legacy sets.
pub const LEGACY: &[SetRecord] = &[MAP006, MAP006_SHORT, ONE_D2_PART_1, ONE_D2_PART_2];
