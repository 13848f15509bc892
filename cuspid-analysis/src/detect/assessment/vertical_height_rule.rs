use crate::detect::assessment::{AssessmentInput, AssessmentRule, RuleOutcome, VerticalHeight};

/// Canine crown height against the middle of the lateral incisor.
#[derive(Debug, Copy, Clone)]
pub struct VerticalHeightRule;

impl AssessmentRule for VerticalHeightRule {
    fn assess(&self, input: &AssessmentInput<'_>) -> Option<RuleOutcome> {
        let keypoints = input.keypoints;
        let axis = input.axis;

        let crown = keypoints.point(axis.canine_crown)?;
        let lateral_root = keypoints.point(axis.lateral_incisor_root)?;
        let lateral_crown = keypoints.point(axis.lateral_incisor_crown)?;
        let half = lateral_root.midpoint(&lateral_crown);

        // image y grows downwards, so a smaller y sits higher up the root
        let height = if crown.y < half.y {
            VerticalHeight::BeyondHalfOfRoot
        } else {
            VerticalHeight::WithinHalfOfRoot
        };
        Some(RuleOutcome::VerticalHeight(height))
    }
}
