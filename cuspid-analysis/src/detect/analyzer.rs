use crate::detect::aggregate::AggregatedKeypoints;
use crate::detect::analysis::compose::CompositeDescriber;
use crate::detect::analysis::AnnotationData;
use crate::detect::assessment::compose::CanineAssessor;
use crate::detect::assessment::AssessmentInput;
use crate::detect::config::AnalysisThresholds;
use crate::detect::landmark::{axis_points, AxisPoints, LandmarkVocabulary};
use crate::detect::predict::{difficult_factors, Prediction};
use crate::detect::property::analyse_result::{AnalysisReport, AnalysisResult, ConfidenceSummary};
use crate::detect::property::measurement::{midline, Measurements};
use crate::detect::property::missing_point;
use crate::detect::property::sector::{SectorAnalysis, SectorLines};
use crate::error::AnalysisError;
use cuspid_inference::inference::keypoint::KeypointDetection;
use cuspid_inference::inference::segment::SegmentationFrame;
use cuspid_inference::inference::Side;
use log::{error, info, warn};
use rayon::prelude::*;

/// Stateless entry point of the impaction analysis. One instance can serve
/// any number of requests concurrently.
pub struct ImpactionAnalyzer {
    thresholds: AnalysisThresholds,
    vocabulary: LandmarkVocabulary,
    assessor: CanineAssessor,
    describer: CompositeDescriber,
}

impl Default for ImpactionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpactionAnalyzer {
    pub fn new() -> Self {
        Self::with_thresholds(AnalysisThresholds::default())
    }

    pub fn with_thresholds(thresholds: AnalysisThresholds) -> Self {
        ImpactionAnalyzer {
            thresholds,
            vocabulary: LandmarkVocabulary::default(),
            assessor: CanineAssessor::new(),
            describer: CompositeDescriber::new(),
        }
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    pub fn vocabulary(&self) -> &LandmarkVocabulary {
        &self.vocabulary
    }

    /// Analyzes a detection labelled with the default vocabulary.
    pub fn analyze(
        &self,
        detection: &KeypointDetection,
        segmentation: Option<&SegmentationFrame>,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.analyze_with_vocabulary(detection, &self.vocabulary, segmentation)
    }

    /// Analyzes every side holding an impacted canine on the segmentation, or
    /// the side the keypoints favour when there is none.
    pub fn analyze_with_vocabulary(
        &self,
        detection: &KeypointDetection,
        vocabulary: &LandmarkVocabulary,
        segmentation: Option<&SegmentationFrame>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let aggregated = AggregatedKeypoints::aggregate(detection, vocabulary, &self.thresholds)?;

        let segmentation = segmentation.map(|frame| {
            frame.suppressed(
                self.thresholds.segmentation_iou_threshold,
                self.thresholds.segmentation_min_confidence,
            )
        });

        let mut sides = segmentation
            .as_ref()
            .map(SegmentationFrame::impacted_canine_sides)
            .unwrap_or_default();
        if sides.is_empty() {
            sides.push(aggregated.side);
        }

        let side_analyses = sides
            .par_iter()
            .map(|side| self.analyze_side(&aggregated, *side, segmentation.as_ref()))
            .collect::<Vec<_>>();

        let primary = if sides.contains(&aggregated.side) {
            aggregated.side
        } else {
            sides[0]
        };

        let prediction_result =
            Prediction::reduce(side_analyses.iter().map(|analysis| analysis.prediction_result));
        info!(
            "Prediction {} from {} of {} side(s), primary side {}",
            prediction_result,
            side_analyses.iter().filter(|analysis| analysis.is_analyzable()).count(),
            side_analyses.len(),
            primary
        );

        Ok(AnalysisReport {
            prediction_result,
            side: primary,
            confidence: ConfidenceSummary::new(
                aggregated.confidence(primary, &self.thresholds),
                aggregated.coverage(primary),
            ),
            keypoints: aggregated.keypoints,
            side_analyses,
        })
    }

    /// Full analysis of one side. Missing keypoints produce an `unknown`
    /// result rather than an error.
    pub fn analyze_side(
        &self,
        aggregated: &AggregatedKeypoints,
        side: Side,
        segmentation: Option<&SegmentationFrame>,
    ) -> AnalysisResult {
        let axis = axis_points(side);
        let confidence = ConfidenceSummary::new(
            aggregated.confidence(side, &self.thresholds),
            aggregated.coverage(side),
        );

        let missing = aggregated.keypoints.missing(&axis.minimal_set());
        let mut result = if !missing.is_empty() {
            warn!("Missing key points for analysis on {} side: {:?}", side, missing);
            AnalysisResult::incomplete(side, missing, confidence)
        } else {
            match self.measure_side(aggregated, &axis, segmentation, confidence) {
                Ok(result) => result,
                Err(e) => {
                    error!("Analysis of {} side failed: {}", side, e);
                    AnalysisResult {
                        error: Some(format!("Analysis failed: {}", e)),
                        ..AnalysisResult::unknown(side, confidence)
                    }
                }
            }
        };

        let annotations = self.describer.describe(&AnnotationData {
            confidence: &result.confidence,
            sector: result.sector_analysis.as_ref(),
            thresholds: &self.thresholds,
        });
        result.warnings = annotations.warnings;
        result.note = annotations.note;
        result
    }

    fn measure_side(
        &self,
        aggregated: &AggregatedKeypoints,
        axis: &AxisPoints,
        segmentation: Option<&SegmentationFrame>,
        confidence: ConfidenceSummary,
    ) -> Result<AnalysisResult, AnalysisError> {
        let keypoints = &aggregated.keypoints;

        let sector_lines = SectorLines::from_keypoints(keypoints, axis)?;
        let canine_root = keypoints
            .point(axis.canine_root)
            .ok_or_else(|| missing_point(axis.canine_root))?;
        let sector = SectorAnalysis::from(sector_lines.classify(&canine_root));

        let midline = midline(keypoints, axis)?;

        let assessment = self.assessor.assess(&AssessmentInput {
            keypoints,
            axis,
            segmentation,
            thresholds: &self.thresholds,
        });

        let measurements = Measurements::measure(keypoints, axis, &self.thresholds)?;

        let factors = difficult_factors(
            &sector,
            &assessment,
            measurements.as_ref().map(|m| &m.angles),
            &self.thresholds,
        );
        let prediction_result = Prediction::from_factors(factors, &self.thresholds);

        Ok(AnalysisResult {
            prediction_result,
            sector_analysis: Some(sector),
            sector_lines: Some(sector_lines),
            midline: Some(midline),
            canine_assessment: Some(assessment),
            angle_measurements: measurements.map(|m| m.angles),
            distances: measurements.map(|m| m.distances),
            canine_axis: measurements.map(|m| m.canine_axis),
            lateral_axis: measurements.map(|m| m.lateral_axis),
            occlusal_plane: measurements.map(|m| m.occlusal_plane),
            difficult_factors: Some(factors),
            ..AnalysisResult::unknown(axis.side, confidence)
        })
    }
}
