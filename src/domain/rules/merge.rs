// Detection merging - groups nearby detections into padded clips

use crate::domain::model::*;

/// Business rules for turning raw detections into clips
pub struct DetectionMerger;

impl DetectionMerger {
    /// Merge detections into clips.
    ///
    /// Input order is not trusted; events are sorted by timestamp first.
    /// Two consecutive events join the same group when their gap is at most
    /// `merge_gap` (inclusive).
    pub fn merge(detections: &[DetectionEvent], params: &MergeParams) -> Vec<Clip> {
        if detections.is_empty() {
            return Vec::new();
        }

        let mut sorted: Vec<&DetectionEvent> = detections.iter().collect();
        sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let mut groups: Vec<Vec<&DetectionEvent>> = Vec::new();
        let mut current = vec![sorted[0]];

        for &det in &sorted[1..] {
            let last = current[current.len() - 1];
            if det.timestamp - last.timestamp <= params.merge_gap {
                current.push(det);
            } else {
                groups.push(std::mem::replace(&mut current, vec![det]));
            }
        }
        groups.push(current);

        groups
            .iter()
            .map(|group| Self::group_to_clip(group, params))
            .collect()
    }

    fn group_to_clip(group: &[&DetectionEvent], params: &MergeParams) -> Clip {
        let first = group[0].timestamp;
        let last = group[group.len() - 1].timestamp;
        let (start, end) = Self::clip_window(first, last, params);

        let mut labels: Vec<String> = Vec::new();
        for det in group {
            if !labels.contains(&det.label) {
                labels.push(det.label.clone());
            }
        }

        let confidence = group
            .iter()
            .map(|d| d.confidence)
            .fold(f64::NEG_INFINITY, f64::max);

        Clip {
            start,
            end,
            labels,
            primary_label: Self::primary_label(group),
            confidence,
            detection_count: group.len(),
        }
    }

    /// Pad the raw span, then stretch it symmetrically to `min_duration`.
    /// Start is clamped at zero; whatever the clamp cuts off goes to the end.
    /// No upper clamp here since the total video length is unknown.
    fn clip_window(first: f64, last: f64, params: &MergeParams) -> (f64, f64) {
        let mut start = (first - params.padding).max(0.0);
        let mut end = last + params.padding;

        let span = end - start;
        if span < params.min_duration {
            let extra = (params.min_duration - span) / 2.0;
            let wanted_start = start - extra;
            start = wanted_start.max(0.0);
            end += extra + (start - wanted_start);
        }

        (start, end)
    }

    /// Most frequent label; ties go to the label with the highest single
    /// confidence, then to the label seen first.
    fn primary_label(group: &[&DetectionEvent]) -> String {
        // (label, count, best confidence) in first-seen order
        let mut tallies: Vec<(&str, usize, f64)> = Vec::new();
        for det in group {
            match tallies.iter_mut().find(|t| t.0 == det.label) {
                Some(tally) => {
                    tally.1 += 1;
                    if det.confidence > tally.2 {
                        tally.2 = det.confidence;
                    }
                }
                None => tallies.push((det.label.as_str(), 1, det.confidence)),
            }
        }

        let mut best = tallies[0];
        for tally in &tallies[1..] {
            let better = tally.1 > best.1 || (tally.1 == best.1 && tally.2 > best.2);
            if better {
                best = *tally;
            }
        }
        best.0.to_string()
    }

    /// Keep detections whose label matches any keyword (substring either way,
    /// case-insensitive). Blank keyword lists keep everything.
    pub fn filter_by_keywords(
        detections: &[DetectionEvent],
        keywords: &[String],
    ) -> Vec<DetectionEvent> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return detections.to_vec();
        }

        detections
            .iter()
            .filter(|det| {
                let label = det.label.to_lowercase();
                keywords
                    .iter()
                    .any(|kw| label.contains(kw.as_str()) || kw.contains(label.as_str()))
            })
            .cloned()
            .collect()
    }
}
