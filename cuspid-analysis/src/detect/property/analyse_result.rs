use crate::detect::aggregate::{Coverage, KeypointMap};
use crate::detect::assessment::CanineAssessment;
use crate::detect::landmark::Landmark;
use crate::detect::predict::Prediction;
use crate::detect::property::line::Line;
use crate::detect::property::measurement::{AngleMeasurements, Distances};
use crate::detect::property::sector::{SectorAnalysis, SectorLines};
use cuspid_inference::inference::Side;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    pub overall_confidence: f32,
    pub keypoints_detected: Coverage,
    pub coverage_ratio: f32,
}

impl ConfidenceSummary {
    pub fn new(overall_confidence: f32, coverage: Coverage) -> Self {
        Self {
            overall_confidence,
            keypoints_detected: coverage,
            coverage_ratio: coverage.ratio(),
        }
    }
}

/// Analysis of one side of the maxilla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub side: Side,
    pub prediction_result: Prediction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_landmarks: Vec<Landmark>,
    pub confidence: ConfidenceSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_analysis: Option<SectorAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_lines: Option<SectorLines>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midline: Option<Line<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canine_assessment: Option<CanineAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_measurements: Option<AngleMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Distances>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canine_axis: Option<Line<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lateral_axis: Option<Line<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusal_plane: Option<Line<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficult_factors: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AnalysisResult {
    /// Result of a side with no geometry: only the verdict and the confidence block.
    pub fn unknown(side: Side, confidence: ConfidenceSummary) -> Self {
        Self {
            side,
            prediction_result: Prediction::Unknown,
            error: None,
            missing_landmarks: Vec::new(),
            confidence,
            sector_analysis: None,
            sector_lines: None,
            midline: None,
            canine_assessment: None,
            angle_measurements: None,
            distances: None,
            canine_axis: None,
            lateral_axis: None,
            occlusal_plane: None,
            difficult_factors: None,
            warnings: Vec::new(),
            note: None,
        }
    }

    /// A side missing part of its minimal keypoint set.
    pub fn incomplete(side: Side, missing: Vec<Landmark>, confidence: ConfidenceSummary) -> Self {
        let labels = missing
            .iter()
            .map(Landmark::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            error: Some(format!("Missing required keypoints: {}", labels)),
            missing_landmarks: missing,
            ..Self::unknown(side, confidence)
        }
    }

    pub fn is_analyzable(&self) -> bool {
        self.prediction_result != Prediction::Unknown
    }
}

impl Display for AnalysisResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Side: {}, Prediction: {}, Keypoints: {}",
            self.side, self.prediction_result, self.confidence.keypoints_detected
        )?;
        if let Some(sector) = &self.sector_analysis {
            write!(f, ", Sector: {}", sector.sector.number())?;
        }
        if let Some(factors) = self.difficult_factors {
            write!(f, ", Difficult factors: {}", factors)?;
        }
        if let Some(error) = &self.error {
            write!(f, ", Error: {}", error)?;
        }
        Ok(())
    }
}

/// Everything computed for one detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub prediction_result: Prediction,
    /// Side the keypoints favour, or the first analyzed side
    pub side: Side,
    pub confidence: ConfidenceSummary,
    pub keypoints: KeypointMap,
    pub side_analyses: Vec<AnalysisResult>,
}

impl AnalysisReport {
    pub fn primary(&self) -> Option<&AnalysisResult> {
        self.side_analyses
            .iter()
            .find(|analysis| analysis.side == self.side)
    }
}

impl Display for AnalysisReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Prediction: {}, Side: {}, Confidence: {:.2}",
            self.prediction_result, self.side, self.confidence.overall_confidence
        )?;
        for analysis in &self.side_analyses {
            write!(f, "\n  {}", analysis)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_result_names_missing_points() -> anyhow::Result<()> {
        let confidence = ConfidenceSummary::new(0.8, Coverage { found: 11, required: 13 });
        let result = AnalysisResult::incomplete(
            Side::Left,
            vec![Landmark::R23, Landmark::C23],
            confidence,
        );
        assert_eq!(result.error.as_deref(), Some("Missing required keypoints: r23, c23"));
        assert!(!result.is_analyzable());

        let json = serde_json::to_value(&result)?;
        assert_eq!(json["prediction_result"], "unknown");
        assert_eq!(json["side"], "left");
        assert_eq!(json["confidence"]["keypoints_detected"], "11/13");
        assert!(json.get("sector_analysis").is_none());
        assert!(json.get("angle_measurements").is_none());
        assert!(json.get("warnings").is_none());
        Ok(())
    }

    #[test]
    fn display_summarizes_the_side() {
        let confidence = ConfidenceSummary::new(0.8, Coverage { found: 13, required: 13 });
        let result = AnalysisResult::unknown(Side::Right, confidence);
        assert_eq!(
            result.to_string(),
            "Side: right, Prediction: unknown, Keypoints: 13/13"
        );
    }
}
