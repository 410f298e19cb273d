use crate::schema::{MatchResult, RankedBatch};
use crate::service::TopK;

/// Best `top_k` results by matching percentage.
///
/// The sort is stable: equal percentages keep their input order.
pub fn rank(mut results: Vec<MatchResult>, top_k: TopK) -> RankedBatch {
    results.sort_by(|a, b| b.matching_percentage.total_cmp(&a.matching_percentage));
    results.truncate(top_k.get());
    RankedBatch::new(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(filename: &str, percentage: f64) -> MatchResult {
        MatchResult {
            filename: filename.to_string(),
            matching_percentage: percentage,
            matching_keywords: Default::default(),
            non_matching_keywords: Default::default(),
            emails: Vec::new(),
            name: None,
            file_path: format!("resume/{filename}"),
            phone: None,
        }
    }

    fn names(batch: &RankedBatch) -> Vec<&str> {
        batch.iter().map(|r| r.filename.as_str()).collect()
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let results = vec![scored("d1", 60.0), scored("d2", 60.0), scored("d3", 80.0)];
        let batch = rank(results, TopK::new(3).unwrap());
        assert_eq!(names(&batch), vec!["d3", "d1", "d2"]);
    }

    #[test]
    fn test_truncates_to_top_k() {
        let results = vec![scored("d1", 60.0), scored("d2", 100.0), scored("d3", 80.0)];
        let batch = rank(results, TopK::new(1).unwrap());
        assert_eq!(names(&batch), vec!["d2"]);
    }

    #[test]
    fn test_fewer_documents_than_top_k() {
        let results = vec![scored("a", 0.0), scored("b", 25.0)];
        let batch = rank(results, TopK::new(10).unwrap());
        assert_eq!(names(&batch), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), TopK::new(5).unwrap()).is_empty());
    }

    #[test]
    fn test_many_ties_are_stable() {
        let results: Vec<_> = (0..50)
            .map(|i| scored(&format!("doc{i:02}"), if i % 3 == 0 { 50.0 } else { 25.0 }))
            .collect();
        let batch = rank(results, TopK::new(50).unwrap());

        let expected: Vec<String> = (0..50)
            .filter(|i| i % 3 == 0)
            .chain((0..50).filter(|i| i % 3 != 0))
            .map(|i| format!("doc{i:02}"))
            .collect();
        assert_eq!(names(&batch), expected);
    }
}
