use super::*;
use crate::model::record::{MethodInputs, ScoredRecord};

fn result(method: Method, scored: &[(&str, f64)]) -> MethodResult {
    let inputs = match method {
        Method::Fmea => MethodInputs::Fmea {
            probability_pct: 1.0,
            impact: 1.0,
            detection: 1.0,
        },
        Method::RiskMatrix => MethodInputs::RiskMatrix {
            probability: 1.0,
            impact: 1.0,
        },
        Method::BowTie => MethodInputs::BowTie {
            cause_likelihood: 1.0,
            consequence_severity: 1.0,
            barrier_effectiveness: 1.0,
        },
    };
    MethodResult {
        method,
        ranked: scored
            .iter()
            .enumerate()
            .map(|(i, (name, score))| ScoredRecord {
                row_index: i,
                risk_name: name.to_string(),
                task_affected: "T".to_string(),
                inputs,
                score: *score,
            })
            .collect(),
        errors: Vec::new(),
    }
}

#[test]
fn test_fmea_is_identity() {
    assert_eq!(normalize(Method::Fmea, 5.0), 5.0);
    assert_eq!(normalize(Method::Fmea, 100.0), 100.0);
    assert_eq!(normalize(Method::Fmea, 0.0), 0.0);
}

#[test]
fn test_risk_matrix_scenario() {
    let v = normalize(Method::RiskMatrix, 20.0);
    assert!((v - 79.166_666_666_666_67).abs() < 1e-9);
    assert_eq!(normalize(Method::RiskMatrix, 1.0), 0.0);
    assert_eq!(normalize(Method::RiskMatrix, 25.0), 100.0);
}

#[test]
fn test_bow_tie_scenario() {
    assert!((normalize(Method::BowTie, 25.0) - 100.0).abs() < 1e-9);
    assert!(normalize(Method::BowTie, 0.2).abs() < 1e-9);
}

#[test]
fn test_strictly_increasing() {
    let samples = [0.2, 0.5, 1.0, 1.5, 4.0, 9.99, 10.0, 16.0, 20.0, 25.0, 80.0];
    for method in Method::ALL {
        for w in samples.windows(2) {
            assert!(
                normalize(method, w[1]) > normalize(method, w[0]),
                "{method} {} -> {}",
                w[0],
                w[1]
            );
        }
    }
}

#[test]
fn test_not_clamped() {
    assert!(normalize(Method::RiskMatrix, 0.0) < 0.0);
    assert!(normalize(Method::BowTie, 30.0) > 100.0);
    assert_eq!(normalize(Method::Fmea, 120.0), 120.0);
}

#[test]
fn test_lookup_found() {
    let r = result(Method::RiskMatrix, &[("A", 20.0), ("B", 4.0)]);
    let cell = lookup(&r, "B");
    assert_eq!(cell.source, ScoreSource::Scored);
    assert_eq!(cell.value, normalize(Method::RiskMatrix, 4.0));
}

#[test]
fn test_lookup_missing_substitutes_raw_zero() {
    let r = result(Method::RiskMatrix, &[("A", 20.0)]);
    let cell = lookup(&r, "Z");
    assert_eq!(cell.source, ScoreSource::Substituted);
    assert_eq!(cell.value, normalize(Method::RiskMatrix, 0.0));

    let r = result(Method::Fmea, &[("A", 20.0)]);
    let cell = lookup(&r, "Z");
    assert_eq!(cell.value, 0.0);
    assert_eq!(cell.source, ScoreSource::Substituted);
}

#[test]
fn test_lookup_duplicate_uses_first_ranked() {
    let r = result(Method::Fmea, &[("A", 30.0), ("A", 10.0)]);
    assert_eq!(lookup(&r, "A").value, 30.0);
}

#[test]
fn test_normalized_scores_follow_ranking() {
    let r = result(Method::BowTie, &[("A", 25.0), ("B", 0.2)]);
    let out = normalized_scores(&r);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].risk_name, "A");
    assert_eq!(out[0].method, Method::BowTie);
    assert!((out[0].value - 100.0).abs() < 1e-9);
    assert!(out[1].value.abs() < 1e-9);
}
