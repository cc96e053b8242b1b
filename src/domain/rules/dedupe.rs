// Scene deduplication by perceptual hash similarity

use std::collections::HashMap;

use crate::domain::model::*;
use crate::utils::time::format_timestamp;

/// Count of differing character positions.
///
/// Returns `None` for hashes of different length, which never match.
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    if a.chars().count() != b.chars().count() {
        return None;
    }
    Some(a.chars().zip(b.chars()).filter(|(x, y)| x != y).count() as u32)
}

/// Business rules for flagging near-duplicate scenes
pub struct SceneDeduplicator;

impl SceneDeduplicator {
    /// Flag each scene that is within `similarity_threshold` of an earlier
    /// canonical scene.
    ///
    /// The first canonical match in insertion order wins, which is the
    /// earliest similar scene rather than the closest one. Scenes with an
    /// empty hash are always unique. Output follows input order.
    pub fn deduplicate(
        thumbprints: &[SceneThumbprint],
        similarity_threshold: u32,
    ) -> Vec<DuplicateVerdict> {
        let mut canonical: Vec<(&str, usize)> = Vec::new();
        let mut verdicts = Vec::with_capacity(thumbprints.len());

        for (index, thumb) in thumbprints.iter().enumerate() {
            let hash = thumb.hash.as_str();

            if hash.is_empty() {
                canonical.push((hash, index));
                verdicts.push(DuplicateVerdict::unique(index));
                continue;
            }

            let matched = canonical.iter().find_map(|(existing, existing_index)| {
                if existing.is_empty() {
                    return None;
                }
                match hamming_distance(existing, hash) {
                    Some(distance) if distance <= similarity_threshold => Some(*existing_index),
                    _ => None,
                }
            });

            match matched {
                Some(of) => verdicts.push(DuplicateVerdict::duplicate(index, of)),
                None => {
                    canonical.push((hash, index));
                    verdicts.push(DuplicateVerdict::unique(index));
                }
            }
        }

        verdicts
    }

    /// Number of scenes not flagged as duplicates
    pub fn unique_count(verdicts: &[DuplicateVerdict]) -> usize {
        verdicts.iter().filter(|v| !v.is_duplicate).count()
    }

    /// Turn deduplicated, classified scenes into candidates, best first.
    ///
    /// `classifications` is keyed by scene index and normally only covers
    /// unique scenes; a duplicate falls back to its canonical scene's label.
    pub fn build_candidates(
        thumbprints: &[SceneThumbprint],
        verdicts: &[DuplicateVerdict],
        classifications: &HashMap<usize, SceneClassification>,
        filter: &CandidateFilter,
    ) -> Vec<SceneCandidate> {
        let unknown = SceneClassification::unknown();
        let mut candidates = Vec::new();

        for (index, thumb) in thumbprints.iter().enumerate() {
            let verdict = verdicts
                .get(index)
                .copied()
                .unwrap_or_else(|| DuplicateVerdict::unique(index));

            let classification = classifications
                .get(&index)
                .or_else(|| verdict.duplicate_of.and_then(|of| classifications.get(&of)))
                .unwrap_or(&unknown);

            if filter.excludes(&classification.label)
                || classification.confidence < filter.min_confidence
            {
                continue;
            }
            if verdict.is_duplicate {
                continue;
            }

            candidates.push(SceneCandidate {
                scene_id: index,
                start: thumb.start,
                end: thumb.end,
                duration: thumb.end - thumb.start,
                start_str: format_timestamp(thumb.start),
                end_str: format_timestamp(thumb.end),
                label: classification.label.clone(),
                confidence: classification.confidence,
                hash: thumb.hash.clone(),
                is_duplicate: verdict.is_duplicate,
                duplicate_of: verdict.duplicate_of,
                user_selected: true,
            });
        }

        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates
    }
}
