use crate::model::record::ScoredRecord;

/// Sorts by descending score. The sort is stable, so equal scores keep
/// their register order.
pub fn rank(mut scored: Vec<ScoredRecord>) -> Vec<ScoredRecord> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

pub fn top_n(ranked: &[ScoredRecord], n: usize) -> &[ScoredRecord] {
    &ranked[..n.min(ranked.len())]
}
