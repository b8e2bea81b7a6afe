//! Match ranking — scores a set of subjects against one job embedding.
//!
//! Single pass, O(n·d). Subjects without a usable embedding are excluded from the ranking and
//! reported separately; one bad subject never fails the batch.

use serde::Serialize;
use tracing::{error, warn};

use crate::matching::similarity::{cosine_similarity, SimilarityError};

/// A scored subject. `subject` is flattened into the serialized form.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch<K> {
    #[serde(flatten)]
    pub subject: K,
    pub score: f32,
}

/// Why a subject was left out of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingEmbedding,
    InvalidEmbedding { error: SimilarityError },
}

/// A subject left out of the ranking. Serializes as the subject's fields plus the reason.
#[derive(Debug, Clone, Serialize)]
pub struct Exclusion<K> {
    #[serde(flatten)]
    pub subject: K,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone)]
pub struct Ranking<K> {
    /// Sorted by score, highest first. Equal scores keep input order.
    pub matches: Vec<RankedMatch<K>>,
    pub excluded: Vec<Exclusion<K>>,
}

/// Ranks `subjects` against `job_embedding`.
///
/// The sort is stable, so ties keep the order in which subjects were supplied and repeated calls
/// with identical input produce identical output.
pub fn rank_subjects<K, I, V>(job_embedding: &[f32], subjects: I) -> Ranking<K>
where
    K: std::fmt::Debug,
    I: IntoIterator<Item = (K, Option<V>)>,
    V: AsRef<[f32]>,
{
    let mut matches = Vec::new();
    let mut excluded = Vec::new();

    for (subject, embedding) in subjects {
        let Some(embedding) = embedding else {
            warn!(?subject, "Skipping subject without embedding");
            excluded.push(Exclusion {
                subject,
                reason: ExclusionReason::MissingEmbedding,
            });
            continue;
        };

        match cosine_similarity(embedding.as_ref(), job_embedding) {
            Ok(score) => matches.push(RankedMatch { subject, score }),
            Err(e) => {
                if e.is_programming_error() {
                    error!(?subject, "Embedding incompatible with job embedding: {e}");
                } else {
                    warn!(?subject, "Skipping subject with unusable embedding: {e}");
                }
                excluded.push(Exclusion {
                    subject,
                    reason: ExclusionReason::InvalidEmbedding { error: e },
                });
            }
        }
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ranking { matches, excluded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<K: Clone>(matches: &[RankedMatch<K>]) -> Vec<K> {
        matches.iter().map(|m| m.subject.clone()).collect()
    }

    #[test]
    fn test_ranks_descending_and_excludes_absent() {
        let subjects = vec![
            ("A", Some(vec![1.0_f32, 0.0])),
            ("B", Some(vec![0.9, 0.1])),
            ("C", None),
        ];
        let ranking = rank_subjects(&[1.0, 0.0], subjects);

        assert_eq!(names(&ranking.matches), vec!["A", "B"]);
        assert_eq!(ranking.excluded.len(), 1);
        assert_eq!(ranking.excluded[0].subject, "C");
        assert_eq!(ranking.excluded[0].reason, ExclusionReason::MissingEmbedding);
    }

    #[test]
    fn test_input_order_does_not_change_ranking_of_distinct_scores() {
        let subjects = vec![
            ("low", Some(vec![0.0_f32, 1.0])),
            ("high", Some(vec![1.0, 0.0])),
            ("mid", Some(vec![1.0, 1.0])),
        ];
        let ranking = rank_subjects(&[1.0, 0.0], subjects);
        assert_eq!(names(&ranking.matches), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let subjects = vec![
            ("first", Some(vec![2.0_f32, 0.0])),
            ("other", Some(vec![0.0, 1.0])),
            ("second", Some(vec![1.0, 0.0])),
            ("third", Some(vec![5.0, 0.0])),
        ];
        let ranking = rank_subjects(&[1.0, 0.0], subjects);
        assert_eq!(
            names(&ranking.matches),
            vec!["first", "second", "third", "other"]
        );
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let subjects = || {
            vec![
                (1, Some(vec![0.5_f32, 0.5])),
                (2, Some(vec![0.5, 0.5])),
                (3, Some(vec![0.2, 0.9])),
            ]
        };
        let a = rank_subjects(&[0.7, 0.3], subjects());
        let b = rank_subjects(&[0.7, 0.3], subjects());
        assert_eq!(names(&a.matches), names(&b.matches));
        assert_eq!(names(&a.matches), vec![1, 2, 3]);
    }

    #[test]
    fn test_bad_entries_do_not_abort_batch() {
        let subjects = vec![
            ("zero", Some(vec![0.0_f32, 0.0])),
            ("short", Some(vec![1.0])),
            ("nan", Some(vec![f32::NAN, 1.0])),
            ("good", Some(vec![1.0, 0.0])),
        ];
        let ranking = rank_subjects(&[1.0, 0.0], subjects);

        assert_eq!(names(&ranking.matches), vec!["good"]);
        assert_eq!(ranking.excluded.len(), 3);
        assert_eq!(
            ranking.excluded[0].reason,
            ExclusionReason::InvalidEmbedding {
                error: SimilarityError::ZeroNorm
            }
        );
        assert_eq!(
            ranking.excluded[1].reason,
            ExclusionReason::InvalidEmbedding {
                error: SimilarityError::DimensionMismatch { left: 1, right: 2 }
            }
        );
    }

    #[test]
    fn test_empty_subject_set_gives_empty_ranking() {
        let ranking = rank_subjects::<&str, _, Vec<f32>>(&[1.0, 0.0], Vec::new());
        assert!(ranking.matches.is_empty());
        assert!(ranking.excluded.is_empty());
    }

    #[test]
    fn test_serialized_match_flattens_subject() {
        #[derive(Debug, Serialize)]
        struct Subject {
            name: &'static str,
        }
        let ranking = rank_subjects(&[1.0, 0.0], vec![(Subject { name: "A" }, Some([1.0_f32, 0.0]))]);
        let json = serde_json::to_value(&ranking.matches).unwrap();
        assert_eq!(json[0]["name"], "A");
        assert!((json[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-6);
    }
}
