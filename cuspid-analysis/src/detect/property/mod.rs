use crate::detect::landmark::Landmark;
use crate::error::AnalysisError;

pub mod analyse_result;
pub mod line;
pub mod measurement;
pub mod sector;

/// Error for a landmark that the caller should have checked beforehand.
pub(crate) fn missing_point(landmark: Landmark) -> AnalysisError {
    AnalysisError::InvalidInput(format!("Missing keypoint {}", landmark))
}
