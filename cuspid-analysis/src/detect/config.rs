//! Decision boundaries of the impaction analysis

use crate::detect::*;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every heuristic constant the pipeline consults, in one reviewable place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    // Keypoint aggregation
    /// Minimum visibility score for a keypoint to be accepted (exclusive, default: 0.2)
    pub keypoint_acceptance: f32,

    /// Lower bound for the confidence given to points without a visibility score (default: 0.5)
    pub default_confidence_min: f32,

    /// Upper bound for the confidence given to points without a visibility score (default: 0.7)
    pub default_confidence_max: f32,

    /// Box confidence assumed when the detector reports none (default: 0.7)
    pub missing_box_confidence: f32,

    pub completeness_base: f32,
    pub completeness_weight: f32,

    /// Confidence multiplier when a critical point is missing (default: 0.8)
    pub critical_missing_penalty: f32,

    // Measurement
    /// Canine/midline angle above which eruption is unfavorable (default: 31°)
    pub midline_angle_limit: f32,

    /// Canine/lateral incisor angle above which eruption is unfavorable (default: 51.47°)
    pub lateral_angle_limit: f32,

    /// Canine/occlusal plane angle above which eruption is unfavorable (default: 132°)
    pub occlusal_angle_limit: f32,

    // Assessment
    /// Root/crown horizontal offset still considered "above" the canine (default: 10 px)
    pub root_position_tolerance_px: f32,

    // Annotations
    pub low_confidence_warning: f32,
    pub coverage_warning: f32,

    // Scoring
    pub palatal_weight: u32,
    pub mid_alveolar_weight: u32,

    /// Difficult factors from which a canine is severely impacted (default: 3)
    pub severe_factor_count: u32,

    /// Difficult factors from which a canine is impacted (default: 1)
    pub impacted_factor_count: u32,

    // Segmentation
    pub segmentation_iou_threshold: f32,
    pub segmentation_min_confidence: f32,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            keypoint_acceptance: KEYPOINT_ACCEPTANCE_THRESHOLD,
            default_confidence_min: DEFAULT_CONFIDENCE_MIN,
            default_confidence_max: DEFAULT_CONFIDENCE_MAX,
            missing_box_confidence: MISSING_BOX_CONFIDENCE,
            completeness_base: COMPLETENESS_BASE,
            completeness_weight: COMPLETENESS_WEIGHT,
            critical_missing_penalty: CRITICAL_MISSING_PENALTY,
            midline_angle_limit: MIDLINE_ANGLE_LIMIT,
            lateral_angle_limit: LATERAL_ANGLE_LIMIT,
            occlusal_angle_limit: OCCLUSAL_ANGLE_LIMIT,
            root_position_tolerance_px: ROOT_POSITION_TOLERANCE_PX,
            low_confidence_warning: LOW_CONFIDENCE_WARNING,
            coverage_warning: COVERAGE_WARNING,
            palatal_weight: PALATAL_WEIGHT,
            mid_alveolar_weight: MID_ALVEOLAR_WEIGHT,
            severe_factor_count: SEVERE_FACTOR_COUNT,
            impacted_factor_count: IMPACTED_FACTOR_COUNT,
            segmentation_iou_threshold: SEGMENTATION_IOU_THRESHOLD,
            segmentation_min_confidence: SEGMENTATION_MIN_CONFIDENCE,
        }
    }
}

impl AnalysisThresholds {
    /// Reads thresholds from a JSON file. Fields left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read thresholds from {}", path.display()))?;
        let thresholds: AnalysisThresholds = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed thresholds in {}", path.display()))?;
        Ok(thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let thresholds: AnalysisThresholds =
            serde_json::from_str(r#"{"midline_angle_limit": 25.0, "severe_factor_count": 4}"#)?;
        assert_eq!(thresholds.midline_angle_limit, 25.0);
        assert_eq!(thresholds.severe_factor_count, 4);
        assert_eq!(thresholds.lateral_angle_limit, 51.47);
        assert_eq!(thresholds.keypoint_acceptance, 0.2);
        Ok(())
    }

    #[test]
    fn load_reads_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("cuspid-thresholds-{}.json", std::process::id()));
        fs::write(&path, r#"{"root_position_tolerance_px": 12.5}"#)?;
        let thresholds = AnalysisThresholds::load(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(thresholds.root_position_tolerance_px, 12.5);
        assert_eq!(thresholds.occlusal_angle_limit, 132.0);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AnalysisThresholds::load("/nonexistent/cuspid.json").is_err());
    }
}
