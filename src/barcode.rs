//! Barcode calling from per-end identity maps.
use std::collections::BTreeMap;

use crate::config::BarcodeParams;
use crate::read::{LabelScore, Read};

/// Best and second-best labels of a score map. Ties rank by label so results are stable.
pub fn rank_scores(scores: &BTreeMap<String, f64>) -> (Option<LabelScore>, Option<LabelScore>) {
    let mut ranked: Vec<(&String, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    let mut it = ranked.into_iter().map(|(l, s)| LabelScore { label: l.clone(), score: *s });
    (it.next(), it.next())
}

fn margin(best: &LabelScore, second: &Option<LabelScore>) -> f64 {
    best.score - second.as_ref().map_or(0.0, |s| s.score)
}

fn confident<'a>(
    best: &'a Option<LabelScore>,
    second: &Option<LabelScore>,
    params: &BarcodeParams,
) -> Option<&'a LabelScore> {
    let b = best.as_ref()?;
    (b.score >= params.threshold && margin(b, second) >= params.diff).then_some(b)
}

/// Decide the barcode of a read from its start/end scores.
///
/// Stores the per-end best and second-best labels, then sets `barcode_call`. When
/// `require_two_barcodes` is set both ends must independently and unambiguously agree;
/// otherwise the two maps are merged (max per label) and ranked once. A reference label
/// that disagrees with the call turns it into "none".
pub fn call_barcode(read: &mut Read, params: &BarcodeParams) {
    let (best_start, second_start) = rank_scores(&read.start_barcode_scores);
    let (best_end, second_end) = rank_scores(&read.end_barcode_scores);

    let call = if params.require_two_barcodes {
        match (
            confident(&best_start, &second_start, params),
            confident(&best_end, &second_end, params),
        ) {
            (Some(s), Some(e)) if s.label == e.label => Some(s.label.clone()),
            _ => None,
        }
    } else {
        let mut merged = read.start_barcode_scores.clone();
        for (label, &score) in &read.end_barcode_scores {
            let e = merged.entry(label.clone()).or_insert(score);
            *e = e.max(score);
        }
        let (best, second) = rank_scores(&merged);
        confident(&best, &second, params).map(|b| b.label.clone())
    };

    read.barcode_call = match (&read.reference_label, call) {
        (Some(reference), Some(c)) if *reference != c => None,
        (_, call) => call,
    };
    read.best_start_barcode = best_start;
    read.second_best_start_barcode = second_start;
    read.best_end_barcode = best_end;
    read.second_best_end_barcode = second_end;
}

#[cfg(test)]
mod barcode_tests {
    use super::*;

    fn params(diff: f64, two: bool) -> BarcodeParams {
        BarcodeParams { threshold: 75.0, diff, require_two_barcodes: two }
    }

    fn read(start: &[(&str, f64)], end: &[(&str, f64)]) -> Read {
        let mut r = Read::new("r", b"ACGT", b"");
        r.start_barcode_scores = start.iter().map(|(l, s)| (l.to_string(), *s)).collect();
        r.end_barcode_scores = end.iter().map(|(l, s)| (l.to_string(), *s)).collect();
        r
    }

    #[test]
    fn margin_decides_call() {
        let mut r = read(&[("BC01", 90.0), ("BC02", 84.0)], &[]);
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call.as_deref(), Some("BC01"));
        assert_eq!(r.best_start_barcode.as_ref().unwrap().score, 90.0);
        assert_eq!(r.second_best_start_barcode.as_ref().unwrap().label, "BC02");

        let mut r = read(&[("BC01", 90.0), ("BC02", 84.0)], &[]);
        call_barcode(&mut r, &params(10.0, false));
        assert_eq!(r.barcode_call, None);
    }

    #[test]
    fn lone_score_only_needs_threshold() {
        let mut r = read(&[], &[("BC07", 76.0)]);
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call.as_deref(), Some("BC07"));
        let mut r = read(&[], &[("BC07", 74.0)]);
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call, None);
    }

    #[test]
    fn either_side_call_is_symmetric() {
        let a = &[("BC03", 92.0), ("BC04", 70.0)][..];
        let b = &[("BC03", 80.0), ("BC04", 86.0)][..];
        let mut r1 = read(a, b);
        let mut r2 = read(b, a);
        call_barcode(&mut r1, &params(5.0, false));
        call_barcode(&mut r2, &params(5.0, false));
        assert_eq!(r1.barcode_call, r2.barcode_call);
        assert_eq!(r1.barcode_call.as_deref(), Some("BC03"));
    }

    #[test]
    fn two_barcodes_must_agree() {
        let mut r = read(&[("BC01", 95.0)], &[("BC01", 88.0)]);
        call_barcode(&mut r, &params(5.0, true));
        assert_eq!(r.barcode_call.as_deref(), Some("BC01"));

        let mut r = read(&[("BC01", 95.0)], &[("BC02", 88.0)]);
        call_barcode(&mut r, &params(5.0, true));
        assert_eq!(r.barcode_call, None);

        let mut r = read(&[("BC01", 95.0)], &[]);
        call_barcode(&mut r, &params(5.0, true));
        assert_eq!(r.barcode_call, None);
    }

    #[test]
    fn two_barcodes_need_a_clear_margin_at_each_end() {
        // Both ends lean BC01, but the end side is too close to BC02.
        let start = &[("BC01", 95.0), ("BC02", 70.0)][..];
        let end = &[("BC01", 88.0), ("BC02", 85.0)][..];
        let mut r = read(start, end);
        call_barcode(&mut r, &params(5.0, true));
        assert_eq!(r.best_end_barcode.as_ref().unwrap().label, "BC01");
        assert_eq!(r.barcode_call, None);

        // Merged, the same scores give a clear BC01.
        let mut r = read(start, end);
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call.as_deref(), Some("BC01"));
    }

    #[test]
    fn reference_label_vetoes_disagreement() {
        let mut r = read(&[("BC01", 99.0)], &[("BC01", 99.0)]);
        r.reference_label = Some("BC02".to_string());
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call, None);

        let mut r = read(&[("BC01", 99.0)], &[]);
        r.reference_label = Some("BC01".to_string());
        call_barcode(&mut r, &params(5.0, false));
        assert_eq!(r.barcode_call.as_deref(), Some("BC01"));
    }

    #[test]
    fn ties_rank_by_label() {
        let scores: BTreeMap<String, f64> =
            [("BC09".to_string(), 80.0), ("BC02".to_string(), 80.0)].into_iter().collect();
        let (best, second) = rank_scores(&scores);
        assert_eq!(best.unwrap().label, "BC02");
        assert_eq!(second.unwrap().label, "BC09");
    }
}
