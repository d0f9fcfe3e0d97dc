//! Score fusion for independently fetched dense and sparse candidate lists.

use std::collections::HashMap;

use lexdb_core::types::RankedResult;

struct FusionEntry {
    dense: f32,
    sparse: f32,
    payload: serde_json::Value,
}

/// Merge dense-similarity and sparse-similarity candidates into one ranking.
///
/// Each identity's fused score is `alpha*dense + (1-alpha)*sparse`, with zero
/// standing in for the side a result is missing from — a document strong in
/// either modality still participates, and `alpha` controls the blend. Sorted
/// by fused score descending; exactly equal scores order by ascending id so
/// the ranking is deterministic regardless of sort stability. Returns the top
/// `limit`.
pub fn fuse(
    dense: &[RankedResult],
    sparse: &[RankedResult],
    alpha: f32,
    limit: usize,
) -> Vec<RankedResult> {
    let mut by_id: HashMap<&str, FusionEntry> = HashMap::new();

    for result in dense {
        by_id.insert(
            result.id.as_str(),
            FusionEntry { dense: result.score, sparse: 0.0, payload: result.payload.clone() },
        );
    }
    for result in sparse {
        by_id
            .entry(result.id.as_str())
            .and_modify(|entry| entry.sparse = result.score)
            .or_insert(FusionEntry {
                dense: 0.0,
                sparse: result.score,
                payload: result.payload.clone(),
            });
    }

    let mut fused: Vec<RankedResult> = by_id
        .into_iter()
        .map(|(id, entry)| RankedResult {
            id: id.to_string(),
            payload: entry.payload,
            score: alpha * entry.dense + (1.0 - alpha) * entry.sparse,
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    fused.truncate(limit);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: f32) -> RankedResult {
        RankedResult { id: id.to_string(), payload: serde_json::Value::Null, score }
    }

    #[test]
    fn blends_both_sides_and_ranks_by_fused_score() {
        let dense = [result("a", 0.9), result("b", 0.4)];
        let sparse = [result("b", 0.8), result("c", 0.5)];

        let fused = fuse(&dense, &sparse, 0.5, 2);
        assert_eq!(fused.len(), 2);
        // a=0.45, b=0.60, c=0.25
        assert_eq!(fused[0].id, "b");
        assert!((fused[0].score - 0.60).abs() < 1e-6);
        assert_eq!(fused[1].id, "a");
        assert!((fused[1].score - 0.45).abs() < 1e-6);
    }

    #[test]
    fn single_sided_results_still_participate() {
        let dense = [result("only-dense", 0.8)];
        let sparse = [result("only-sparse", 0.8)];

        let fused = fuse(&dense, &sparse, 1.0, 10);
        assert_eq!(fused[0].id, "only-dense");
        assert!((fused[0].score - 0.8).abs() < 1e-6);
        // The sparse-only hit scores alpha*0 but is present.
        assert_eq!(fused[1].id, "only-sparse");
        assert!(fused[1].score.abs() < 1e-6);
    }

    #[test]
    fn equal_scores_break_ties_by_ascending_id() {
        let dense = [result("zz", 0.5), result("aa", 0.5)];
        let fused = fuse(&dense, &[], 1.0, 10);
        assert_eq!(fused[0].id, "aa");
        assert_eq!(fused[1].id, "zz");
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let dense: Vec<_> = (0..10).map(|i| result(&format!("d{i}"), i as f32)).collect();
        let fused = fuse(&dense, &[], 1.0, 3);
        assert_eq!(fused.len(), 3);
        assert_eq!(fused[0].id, "d9");
    }
}
