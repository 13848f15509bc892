use crate::inference::{NMSImplement, Side};
use crate::utils::graph::BoundingBox;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Tooth categories produced by the segmentation model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToothClass {
    CentralIncisor,
    LateralIncisor,
    ImpactedCanine,
    FirstPremolar,
    SecondPremolar,
    Other(String),
}

impl ToothClass {
    pub fn as_str(&self) -> &str {
        match self {
            ToothClass::CentralIncisor => "Central incisor",
            ToothClass::LateralIncisor => "Lateral incisor",
            ToothClass::ImpactedCanine => "Impacted canine",
            ToothClass::FirstPremolar => "First premolar",
            ToothClass::SecondPremolar => "Second premolar",
            ToothClass::Other(name) => name,
        }
    }
}

impl From<String> for ToothClass {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Central incisor" => ToothClass::CentralIncisor,
            "Lateral incisor" => ToothClass::LateralIncisor,
            "Impacted canine" => ToothClass::ImpactedCanine,
            "First premolar" => ToothClass::FirstPremolar,
            "Second premolar" => ToothClass::SecondPremolar,
            _ => ToothClass::Other(name),
        }
    }
}

impl From<ToothClass> for String {
    fn from(class: ToothClass) -> Self {
        class.as_str().to_string()
    }
}

impl Display for ToothClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationFinding {
    pub class_name: ToothClass,
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// Outline as a flat list of `x, y` pairs normalized to the mask size.
    #[serde(default)]
    pub polygon: Vec<f32>,
    #[serde(default)]
    pub area: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

/// All findings of one radiograph together with the width used to split
/// them into left and right teeth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationFrame {
    pub image_width: u32,
    #[serde(default)]
    pub segmentations: Vec<SegmentationFinding>,
}

impl SegmentationFrame {
    pub fn new(image_width: u32, segmentations: Vec<SegmentationFinding>) -> Self {
        Self {
            image_width,
            segmentations,
        }
    }

    /// Side of the finding's bounding-box center relative to the image midline.
    pub fn position_side(&self, finding: &SegmentationFinding) -> Side {
        if finding.bbox.center_x() < self.image_width as f32 / 2.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// The finding's own side tag, falling back to its position.
    pub fn side_of(&self, finding: &SegmentationFinding) -> Side {
        finding
            .side
            .unwrap_or_else(|| self.position_side(finding))
    }

    /// Splits the findings into `(left_teeth, right_teeth)`.
    pub fn partition_sides(&self) -> (Vec<&SegmentationFinding>, Vec<&SegmentationFinding>) {
        self.segmentations
            .iter()
            .partition(|finding| self.side_of(finding) == Side::Left)
    }

    /// Highest-confidence finding of `class` whose box center lies on `side`.
    pub fn find_on_side(&self, class: &ToothClass, side: Side) -> Option<&SegmentationFinding> {
        self.segmentations
            .iter()
            .filter(|finding| &finding.class_name == class)
            .filter(|finding| self.position_side(finding) == side)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    /// Sides holding at least one impacted canine, in order of first appearance.
    pub fn impacted_canine_sides(&self) -> Vec<Side> {
        let mut sides = Vec::new();
        for finding in &self.segmentations {
            if finding.class_name != ToothClass::ImpactedCanine {
                continue;
            }
            let side = self.side_of(finding);
            if !sides.contains(&side) {
                sides.push(side);
            }
        }
        sides
    }

    /// Drops duplicate findings of the same class, keeping the strongest one.
    pub fn suppressed(&self, iou_threshold: f32, score_threshold: f32) -> Self {
        let before = self.segmentations.len();
        let segmentations = self
            .segmentations
            .clone()
            .non_maximum_suppression(iou_threshold, score_threshold);
        debug!(
            "Segmentation suppression kept {} of {} findings",
            segmentations.len(),
            before
        );

        Self {
            image_width: self.image_width,
            segmentations,
        }
    }
}
