pub mod compose;
mod overlap_rule;
mod root_position_rule;
mod vertical_height_rule;
#[macro_use]
mod rule_macro;

use crate::detect::aggregate::KeypointMap;
use crate::detect::config::AnalysisThresholds;
use crate::detect::landmark::AxisPoints;
use crate::detect::assessment::overlap_rule::OverlapRule;
use crate::detect::assessment::root_position_rule::RootPositionRule;
use crate::detect::assessment::vertical_height_rule::VerticalHeightRule;
use crate::detect::property::measurement::Difficulty;
use cuspid_inference::inference::segment::SegmentationFrame;
use serde::{Deserialize, Serialize};

/// Everything a rule may look at for one side.
#[derive(Debug, Copy, Clone)]
pub struct AssessmentInput<'a> {
    pub keypoints: &'a KeypointMap,
    pub axis: &'a AxisPoints,
    pub segmentation: Option<&'a SegmentationFrame>,
    pub thresholds: &'a AnalysisThresholds,
}

/// One heuristic contributing to the eruption-difficulty verdict.
pub trait AssessmentRule {
    /// Returns `None` when the rule has no evidence to judge on.
    fn assess(&self, input: &AssessmentInput<'_>) -> Option<RuleOutcome>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlap {
    Yes,
    No,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalHeight {
    #[serde(rename = "Beyond half of root")]
    BeyondHalfOfRoot,
    #[serde(rename = "Within half of root")]
    WithinHalfOfRoot,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootPosition {
    #[serde(rename = "Above canine position")]
    AboveCanine,
    #[serde(rename = "Other position")]
    Other,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Overlap(Overlap),
    VerticalHeight(VerticalHeight),
    RootPosition(RootPosition),
}

impl RuleOutcome {
    pub fn difficulty(&self) -> Difficulty {
        match self {
            RuleOutcome::Overlap(Overlap::Yes)
            | RuleOutcome::VerticalHeight(VerticalHeight::BeyondHalfOfRoot)
            | RuleOutcome::RootPosition(RootPosition::Other) => Difficulty::Unfavorable,
            RuleOutcome::Overlap(Overlap::No)
            | RuleOutcome::VerticalHeight(VerticalHeight::WithinHalfOfRoot)
            | RuleOutcome::RootPosition(RootPosition::AboveCanine) => Difficulty::Favorable,
            RuleOutcome::Overlap(Overlap::Unknown)
            | RuleOutcome::VerticalHeight(VerticalHeight::Unknown)
            | RuleOutcome::RootPosition(RootPosition::Unknown) => Difficulty::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanineAssessment {
    pub overlap: Overlap,
    pub vertical_height: VerticalHeight,
    pub root_position: RootPosition,
    pub eruption_difficulty: Difficulty,
}

impl Default for CanineAssessment {
    fn default() -> Self {
        Self {
            overlap: Overlap::Unknown,
            vertical_height: VerticalHeight::Unknown,
            root_position: RootPosition::Unknown,
            eruption_difficulty: Difficulty::Unknown,
        }
    }
}

impl CanineAssessment {
    /// Records an outcome. Once unfavorable, the verdict stays unfavorable.
    pub fn apply(mut self, outcome: RuleOutcome) -> Self {
        match outcome {
            RuleOutcome::Overlap(overlap) => self.overlap = overlap,
            RuleOutcome::VerticalHeight(height) => self.vertical_height = height,
            RuleOutcome::RootPosition(position) => self.root_position = position,
        }

        let difficulty = outcome.difficulty();
        if difficulty != Difficulty::Unknown && !self.eruption_difficulty.is_unfavorable() {
            self.eruption_difficulty = difficulty;
        }
        self
    }
}

// Precedence order of the fold.
define_rules![
    Overlap => OverlapRule,
    VerticalHeight => VerticalHeightRule,
    RootPosition => RootPositionRule,
];
