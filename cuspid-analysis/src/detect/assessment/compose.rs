use crate::detect::assessment::{
    AssessmentInput, AssessmentRule, CanineAssessment, RuleDispatcher,
};

/// Folds the rules, in precedence order, into one canine assessment.
pub struct CanineAssessor {
    rules: Vec<RuleDispatcher>,
}

impl Default for CanineAssessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CanineAssessor {
    pub fn new() -> Self {
        CanineAssessor {
            rules: RuleDispatcher::all(),
        }
    }

    pub fn assess(&self, input: &AssessmentInput<'_>) -> CanineAssessment {
        self.rules
            .iter()
            .filter_map(|rule| rule.assess(input))
            .fold(CanineAssessment::default(), CanineAssessment::apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::aggregate::{Keypoint, KeypointMap};
    use crate::detect::assessment::{Overlap, RootPosition, VerticalHeight};
    use crate::detect::config::AnalysisThresholds;
    use crate::detect::landmark::{axis_points, Landmark};
    use crate::detect::property::measurement::Difficulty;
    use cuspid_inference::inference::segment::{SegmentationFinding, SegmentationFrame, ToothClass};
    use cuspid_inference::inference::Side;
    use cuspid_inference::utils::graph::BoundingBox;

    fn canine(root: (f32, f32), crown: (f32, f32)) -> KeypointMap {
        let kp = |(x, y): (f32, f32)| Keypoint::new(x, y, 0.9);
        [
            (Landmark::R12, kp((560.0, 100.0))),
            (Landmark::C12, kp((560.0, 300.0))),
            (Landmark::R13, kp(root)),
            (Landmark::C13, kp(crown)),
        ]
        .into_iter()
        .collect()
    }

    fn assess(keypoints: &KeypointMap, segmentation: Option<&SegmentationFrame>) -> CanineAssessment {
        let axis = axis_points(Side::Right);
        let thresholds = AnalysisThresholds::default();
        CanineAssessor::new().assess(&AssessmentInput {
            keypoints,
            axis: &axis,
            segmentation,
            thresholds: &thresholds,
        })
    }

    fn finding(class: ToothClass, bbox: [f32; 4]) -> SegmentationFinding {
        SegmentationFinding {
            class_name: class,
            confidence: 0.9,
            bbox: BoundingBox::from(bbox),
            polygon: vec![],
            area: 0.0,
            side: None,
        }
    }

    #[test]
    fn upright_canine_without_segmentation_is_favorable() {
        let assessment = assess(&canine((620.0, 100.0), (620.0, 300.0)), None);
        assert_eq!(assessment.overlap, Overlap::Unknown);
        assert_eq!(assessment.vertical_height, VerticalHeight::WithinHalfOfRoot);
        assert_eq!(assessment.root_position, RootPosition::AboveCanine);
        assert_eq!(assessment.eruption_difficulty, Difficulty::Favorable);
    }

    #[test]
    fn crown_above_lateral_midpoint_is_beyond_half() {
        let assessment = assess(&canine((625.0, 60.0), (620.0, 150.0)), None);
        assert_eq!(assessment.vertical_height, VerticalHeight::BeyondHalfOfRoot);
        assert_eq!(assessment.root_position, RootPosition::AboveCanine);
        assert_eq!(assessment.eruption_difficulty, Difficulty::Unfavorable);
    }

    #[test]
    fn offset_root_is_other_position() {
        let assessment = assess(&canine((700.0, 100.0), (620.0, 300.0)), None);
        assert_eq!(assessment.root_position, RootPosition::Other);
        assert_eq!(assessment.eruption_difficulty, Difficulty::Unfavorable);
    }

    #[test]
    fn overlap_decides_before_favorable_rules() {
        let frame = SegmentationFrame::new(
            1000,
            vec![
                finding(ToothClass::ImpactedCanine, [600.0, 100.0, 700.0, 300.0]),
                finding(ToothClass::LateralIncisor, [540.0, 80.0, 610.0, 320.0]),
            ],
        );
        let assessment = assess(&canine((620.0, 100.0), (620.0, 300.0)), Some(&frame));
        assert_eq!(assessment.overlap, Overlap::Yes);
        assert_eq!(assessment.root_position, RootPosition::AboveCanine);
        assert_eq!(assessment.eruption_difficulty, Difficulty::Unfavorable);
    }

    #[test]
    fn no_keypoints_leaves_everything_unknown() {
        assert_eq!(assess(&KeypointMap::default(), None), CanineAssessment::default());
    }
}
