//! Error types for the impaction analysis

use crate::detect::landmark::Landmark;
use std::fmt;

/// Failures that end an analysis request.
///
/// Missing landmarks on one side are not errors: they are reported inside
/// the per-side result so the reviewer can see why no geometry was computed.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The detector produced no keypoint above the acceptance threshold
    DetectionEmpty,

    /// The label vocabulary does not cover the detector's rows one to one
    VocabularyMismatch { labels: usize, keypoints: usize },

    /// An indexed vocabulary skips this index
    VocabularyGap(usize),

    /// A vocabulary entry names no known landmark
    UnknownLabel(String),

    /// Two vocabulary entries name the same landmark
    DuplicateLabel(Landmark),

    /// Malformed detector output
    InvalidInput(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::DetectionEmpty => write!(f, "No valid keypoints detected"),
            AnalysisError::VocabularyMismatch { labels, keypoints } => write!(
                f,
                "Label vocabulary has {} entries but the detector returned {} keypoints",
                labels, keypoints
            ),
            AnalysisError::VocabularyGap(index) => {
                write!(f, "Label vocabulary has no entry for index {}", index)
            }
            AnalysisError::UnknownLabel(label) => write!(f, "Unknown landmark label: {}", label),
            AnalysisError::DuplicateLabel(landmark) => {
                write!(f, "Landmark {} appears more than once in the vocabulary", landmark)
            }
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

