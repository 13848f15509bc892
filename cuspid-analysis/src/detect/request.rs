use crate::detect::analyzer::ImpactionAnalyzer;
use crate::detect::landmark::LandmarkVocabulary;
use crate::detect::property::analyse_result::AnalysisReport;
use crate::error::AnalysisError;
use cuspid_inference::inference::keypoint::KeypointDetection;
use cuspid_inference::inference::segment::SegmentationFrame;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label vocabulary as sent by callers: a list in row order, or an
/// index → label object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelSpec {
    Ordered(Vec<String>),
    Indexed(BTreeMap<String, String>),
}

impl LabelSpec {
    pub fn vocabulary(&self) -> Result<LandmarkVocabulary, AnalysisError> {
        match self {
            LabelSpec::Ordered(labels) => LandmarkVocabulary::from_labels(labels.as_slice()),
            LabelSpec::Indexed(labels) => {
                // JSON object keys are strings
                let indexed = labels
                    .iter()
                    .map(|(index, label)| {
                        index
                            .trim()
                            .parse::<usize>()
                            .map(|index| (index, label.clone()))
                            .map_err(|_| {
                                AnalysisError::InvalidInput(format!("Label index {:?} is not a number", index))
                            })
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                LandmarkVocabulary::from_indexed(&indexed)
            }
        }
    }
}

/// One detection to analyze, in its JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// One `[x, y]` or `[x, y, confidence]` row per landmark
    pub keypoints: Vec<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<SegmentationFrame>,
}

impl AnalysisRequest {
    pub fn detection(&self) -> Result<KeypointDetection, AnalysisError> {
        KeypointDetection::from_rows(&self.keypoints, self.box_confidence)
            .map_err(|e| AnalysisError::InvalidInput(e.to_string()))
    }

    pub fn analyze(&self, analyzer: &ImpactionAnalyzer) -> Result<AnalysisReport, AnalysisError> {
        let detection = self.detection()?;
        let segmentation = self.segmentation.as_ref();
        match &self.labels {
            Some(labels) => {
                analyzer.analyze_with_vocabulary(&detection, &labels.vocabulary()?, segmentation)
            }
            None => analyzer.analyze(&detection, segmentation),
        }
    }
}

impl ImpactionAnalyzer {
    /// Analyzes independent requests in parallel, keeping their order.
    pub fn analyze_batch(
        &self,
        requests: &[AnalysisRequest],
    ) -> Vec<Result<AnalysisReport, AnalysisError>> {
        requests
            .par_iter()
            .map(|request| request.analyze(self))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_accept_both_shapes() -> anyhow::Result<()> {
        let ordered: LabelSpec = serde_json::from_str(r#"["m1", "m2"]"#)?;
        assert_eq!(ordered.vocabulary()?.len(), 2);

        let indexed: LabelSpec = serde_json::from_str(r#"{"1": "r13", "0": "c13"}"#)?;
        let vocabulary = indexed.vocabulary()?;
        assert_eq!(vocabulary.labels().collect::<Vec<_>>(), vec!["c13", "r13"]);

        let bad: LabelSpec = serde_json::from_str(r#"{"first": "r13"}"#)?;
        assert!(matches!(bad.vocabulary(), Err(AnalysisError::InvalidInput(_))));
        Ok(())
    }

    #[test]
    fn malformed_rows_are_invalid_input() -> anyhow::Result<()> {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"keypoints": [[1.0], [2.0]]}"#)?;
        let result = request.analyze(&ImpactionAnalyzer::new());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
        Ok(())
    }

    #[test]
    fn unknown_label_is_rejected() -> anyhow::Result<()> {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"keypoints": [[1.0, 2.0, 0.9]], "labels": ["canine"]}"#,
        )?;
        let result = request.analyze(&ImpactionAnalyzer::new());
        assert_eq!(result.err(), Some(AnalysisError::UnknownLabel("canine".to_string())));
        Ok(())
    }

    #[test]
    fn batch_keeps_request_order() -> anyhow::Result<()> {
        let empty: AnalysisRequest = serde_json::from_str(r#"{"keypoints": []}"#)?;
        let mismatched: AnalysisRequest =
            serde_json::from_str(r#"{"keypoints": [[1.0, 2.0, 0.9]]}"#)?;

        let results = ImpactionAnalyzer::new().analyze_batch(&[empty, mismatched]);
        assert_eq!(results[0].as_ref().err(), Some(&AnalysisError::DetectionEmpty));
        assert!(matches!(
            results[1],
            Err(AnalysisError::VocabularyMismatch { labels: 24, keypoints: 1 })
        ));
        Ok(())
    }
}
