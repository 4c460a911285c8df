use crate::image_classifier::interface::Classification;

/// Pairs raw model scores with labels and keeps the `max_results` most confident, highest
/// first. Scores outside [0, 1] are treated as logits and passed through a softmax.
pub fn top_categories(scores: &[f32], labels: &[String], max_results: usize) -> Vec<Classification> {
    let probabilities = if scores.iter().all(|s| (0.0..=1.0).contains(s)) {
        scores.to_vec()
    } else {
        softmax(scores)
    };

    let mut categories: Vec<Classification> = probabilities
        .into_iter()
        .enumerate()
        .map(|(index, confidence)| Classification {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("class {}", index)),
            confidence,
        })
        .collect();

    categories.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    categories.truncate(max_results);
    categories
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_keeps_top_three_in_descending_order() {
        let result = top_categories(
            &[0.1, 0.5, 0.05, 0.3, 0.05],
            &labels(&["a", "b", "c", "d", "e"]),
            3,
        );

        let names: Vec<&str> = result.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a"]);
        assert_eq!(result[0].confidence, 0.5);
    }

    #[test]
    fn test_logits_become_probabilities() {
        let result = top_categories(&[2.0, -1.0, 0.5], &labels(&["x", "y", "z"]), 3);

        let total: f32 = result.iter().map(|c| c.confidence).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(result.iter().all(|c| (0.0..=1.0).contains(&c.confidence)));
        assert_eq!(result[0].label, "x");
    }

    #[test]
    fn test_missing_labels_fall_back_to_index() {
        let result = top_categories(&[0.2, 0.8], &labels(&["only"]), 3);

        assert_eq!(result[0].label, "class 1");
        assert_eq!(result[1].label, "only");
    }

    #[test]
    fn test_empty_scores() {
        assert!(top_categories(&[], &[], 3).is_empty());
    }
}
