use crate::detect::assessment::{AssessmentInput, AssessmentRule, RootPosition, RuleOutcome};

#[derive(Debug, Copy, Clone)]
pub struct RootPositionRule;

impl AssessmentRule for RootPositionRule {
    fn assess(&self, input: &AssessmentInput<'_>) -> Option<RuleOutcome> {
        let root = input.keypoints.point(input.axis.canine_root)?;
        let crown = input.keypoints.point(input.axis.canine_crown)?;

        let position = if (root.x - crown.x).abs() < input.thresholds.root_position_tolerance_px {
            RootPosition::AboveCanine
        } else {
            RootPosition::Other
        };
        Some(RuleOutcome::RootPosition(position))
    }
}
