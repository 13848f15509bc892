//! Maxillary canine impaction analysis over dental keypoint detections.
//!
//! [`ImpactionAnalyzer`] turns raw detector rows, and optionally a tooth
//! segmentation, into an [`AnalysisReport`]: sector of the canine root, canine
//! assessment, angle measurements and an impaction prediction per side.

pub mod detect;
pub mod error;

pub use detect::analyzer::ImpactionAnalyzer;
pub use detect::config::AnalysisThresholds;
pub use detect::predict::Prediction;
pub use detect::property::analyse_result::{AnalysisReport, AnalysisResult};
pub use detect::request::AnalysisRequest;
pub use error::AnalysisError;
