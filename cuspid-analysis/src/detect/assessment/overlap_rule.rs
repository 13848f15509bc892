use crate::detect::assessment::{AssessmentInput, AssessmentRule, Overlap, RuleOutcome};
use cuspid_inference::inference::segment::ToothClass;
use log::debug;

/// Impacted canine crossing the lateral incisor on the segmentation.
#[derive(Debug, Copy, Clone)]
pub struct OverlapRule;

impl AssessmentRule for OverlapRule {
    fn assess(&self, input: &AssessmentInput<'_>) -> Option<RuleOutcome> {
        let frame = input.segmentation?;
        let side = input.axis.side;

        let canine = frame.find_on_side(&ToothClass::ImpactedCanine, side);
        let lateral = frame.find_on_side(&ToothClass::LateralIncisor, side);
        let (Some(canine), Some(lateral)) = (canine, lateral) else {
            debug!("No canine/lateral incisor pair segmented on {} side", side);
            return None;
        };

        let area = canine.bbox.intersection_area(&lateral.bbox);
        let overlap = if area > 0.0 { Overlap::Yes } else { Overlap::No };
        Some(RuleOutcome::Overlap(overlap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::aggregate::KeypointMap;
    use crate::detect::config::AnalysisThresholds;
    use crate::detect::landmark::axis_points;
    use cuspid_inference::inference::segment::{SegmentationFinding, SegmentationFrame};
    use cuspid_inference::inference::Side;
    use cuspid_inference::utils::graph::BoundingBox;

    fn finding(class: ToothClass, bbox: [f32; 4], confidence: f32) -> SegmentationFinding {
        SegmentationFinding {
            class_name: class,
            confidence,
            bbox: BoundingBox::from(bbox),
            polygon: vec![],
            area: 0.0,
            side: None,
        }
    }

    fn assess(frame: Option<&SegmentationFrame>, side: Side) -> Option<RuleOutcome> {
        let keypoints = KeypointMap::default();
        let axis = axis_points(side);
        let thresholds = AnalysisThresholds::default();
        OverlapRule.assess(&AssessmentInput {
            keypoints: &keypoints,
            axis: &axis,
            segmentation: frame,
            thresholds: &thresholds,
        })
    }

    #[test]
    fn intersecting_boxes_overlap() {
        let frame = SegmentationFrame::new(
            1000,
            vec![
                finding(ToothClass::ImpactedCanine, [600.0, 100.0, 700.0, 300.0], 0.9),
                finding(ToothClass::LateralIncisor, [680.0, 50.0, 760.0, 250.0], 0.8),
            ],
        );
        assert_eq!(
            assess(Some(&frame), Side::Right),
            Some(RuleOutcome::Overlap(Overlap::Yes))
        );
        // nothing segmented on the other half
        assert_eq!(assess(Some(&frame), Side::Left), None);
    }

    #[test]
    fn strongest_lateral_incisor_is_used() {
        let frame = SegmentationFrame::new(
            1000,
            vec![
                finding(ToothClass::ImpactedCanine, [600.0, 100.0, 700.0, 300.0], 0.9),
                finding(ToothClass::LateralIncisor, [650.0, 50.0, 760.0, 250.0], 0.4),
                finding(ToothClass::LateralIncisor, [800.0, 50.0, 900.0, 250.0], 0.9),
            ],
        );
        assert_eq!(
            assess(Some(&frame), Side::Right),
            Some(RuleOutcome::Overlap(Overlap::No))
        );
    }

    #[test]
    fn no_segmentation_has_no_opinion() {
        assert_eq!(assess(None, Side::Right), None);
    }
}
