//! Rank fusion for hybrid retrieval.
//!
//! Two fusion strategies over a semantic ranking and a keyword ranking:
//!
//! - [`weighted_fusion`]: max-normalize each list's scores to [0, 1],
//!   then combine with fixed weights. The default, matching the
//!   fixed-weight hybrid retrieval this tool is configured with.
//! - [`reciprocal_rank_fusion`]: rank-only fusion, `weight / (k + rank)`
//!   with k = 60. Robust to score-scale differences between retrievers.
//!
//! Both accept rankings as `(id, score)` pairs ordered by descending
//! relevance and return fused entries ordered the same way.

use std::collections::HashMap;

use uuid::Uuid;

/// RRF rank constant.
const RRF_K: f32 = 60.0;

/// A fused ranking entry with its per-retriever components.
///
/// `semantic` / `keyword` hold the normalized contribution from each
/// ranking (None when the chunk did not appear in that ranking).
#[derive(Debug, Clone)]
pub struct FusedEntry {
    pub id: Uuid,
    pub score: f32,
    pub semantic: Option<f32>,
    pub keyword: Option<f32>,
}

/// Max-normalize each ranking, then combine with fixed weights.
pub fn weighted_fusion(
    semantic: &[(Uuid, f32)],
    keyword: &[(Uuid, f32)],
    semantic_weight: f32,
    keyword_weight: f32,
) -> Vec<FusedEntry> {
    let mut components: HashMap<Uuid, (Option<f32>, Option<f32>)> = HashMap::new();

    let s_max = semantic.iter().map(|(_, s)| *s).fold(0.0f32, f32::max);
    for (id, score) in semantic {
        let norm = if s_max > 0.0 { score / s_max } else { 0.0 };
        components.entry(*id).or_insert((None, None)).0 = Some(norm);
    }

    let k_max = keyword.iter().map(|(_, s)| *s).fold(0.0f32, f32::max);
    for (id, score) in keyword {
        let norm = if k_max > 0.0 { score / k_max } else { 0.0 };
        components.entry(*id).or_insert((None, None)).1 = Some(norm);
    }

    let mut fused: Vec<FusedEntry> = components
        .into_iter()
        .map(|(id, (sem, kw))| FusedEntry {
            id,
            score: sem.unwrap_or(0.0) * semantic_weight + kw.unwrap_or(0.0) * keyword_weight,
            semantic: sem,
            keyword: kw,
        })
        .collect();

    sort_descending(&mut fused);
    fused
}

/// Reciprocal rank fusion: each ranking contributes `weight / (k + rank)`.
///
/// Ranks are 1-based; scores in the input lists are ignored beyond their
/// ordering.
pub fn reciprocal_rank_fusion(
    semantic: &[(Uuid, f32)],
    keyword: &[(Uuid, f32)],
    semantic_weight: f32,
    keyword_weight: f32,
) -> Vec<FusedEntry> {
    let mut components: HashMap<Uuid, (Option<f32>, Option<f32>)> = HashMap::new();

    for (rank, (id, _)) in semantic.iter().enumerate() {
        let contribution = semantic_weight / (RRF_K + rank as f32 + 1.0);
        components.entry(*id).or_insert((None, None)).0 = Some(contribution);
    }

    for (rank, (id, _)) in keyword.iter().enumerate() {
        let contribution = keyword_weight / (RRF_K + rank as f32 + 1.0);
        components.entry(*id).or_insert((None, None)).1 = Some(contribution);
    }

    let mut fused: Vec<FusedEntry> = components
        .into_iter()
        .map(|(id, (sem, kw))| FusedEntry {
            id,
            score: sem.unwrap_or(0.0) + kw.unwrap_or(0.0),
            semantic: sem,
            keyword: kw,
        })
        .collect();

    sort_descending(&mut fused);
    fused
}

fn sort_descending(entries: &mut [FusedEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
