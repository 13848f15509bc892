use segment::SegmentationFinding;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod keypoint;
pub mod segment;

/// Patient side of the maxilla, as labelled on the radiograph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Right => "right",
            Side::Left => "left",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait NMSImplement {
    fn non_maximum_suppression(
        self,
        iou_threshold: f32,
        score_threshold: f32,
    ) -> Vec<SegmentationFinding>;
}

impl NMSImplement for Vec<SegmentationFinding> {
    fn non_maximum_suppression(
        self,
        iou_threshold: f32,
        score_threshold: f32,
    ) -> Vec<SegmentationFinding> {
        let mut filtered: Vec<SegmentationFinding> = self
            .into_iter()
            .filter(|finding| finding.confidence >= score_threshold)
            .collect();

        // highest confidence first
        filtered.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut result: Vec<SegmentationFinding> = Vec::new();

        while !filtered.is_empty() {
            let best = filtered.remove(0);

            // only findings of the same class compete with each other
            filtered.retain(|finding| {
                finding.class_name != best.class_name || best.bbox.iou(&finding.bbox) < iou_threshold
            });
            result.push(best);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::segment::ToothClass;
    use super::*;
    use crate::utils::graph::BoundingBox;

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

    #[test]
    fn suppresses_overlapping_duplicates_of_one_class() {
        let findings = vec![
            finding(ToothClass::ImpactedCanine, [0.0, 0.0, 10.0, 10.0], 0.6),
            finding(ToothClass::ImpactedCanine, [1.0, 1.0, 10.0, 10.0], 0.9),
            finding(ToothClass::LateralIncisor, [0.0, 0.0, 10.0, 10.0], 0.5),
            finding(ToothClass::ImpactedCanine, [50.0, 50.0, 60.0, 60.0], 0.7),
        ];

        let kept = findings.non_maximum_suppression(0.5, 0.0);
        let confidences = kept.iter().map(|f| f.confidence).collect::<Vec<_>>();
        assert_eq!(confidences, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn drops_findings_under_score_threshold() {
        let findings = vec![
            finding(ToothClass::ImpactedCanine, [0.0, 0.0, 10.0, 10.0], 0.2),
            finding(ToothClass::LateralIncisor, [0.0, 0.0, 10.0, 10.0], 0.5),
        ];
        let kept = findings.non_maximum_suppression(0.5, 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_name, ToothClass::LateralIncisor);
    }

    #[test]
    fn side_serializes_lowercase() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Side::Left)?, r#""left""#);
        let side: Side = serde_json::from_str(r#""right""#)?;
        assert_eq!(side, Side::Right);
        Ok(())
    }
}
