use crate::detect::aggregate::KeypointMap;
use crate::detect::landmark::{AxisPoints, Landmark};
use crate::detect::property::line::Line;
use crate::detect::property::missing_point;
use crate::error::AnalysisError;
use cuspid_inference::utils::graph::Point;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Region of the canine root relative to the neighbouring teeth.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sector {
    /// Outside the three boundary lines
    Outside = 1,
    Buccal = 2,
    MidAlveolar = 3,
    Palatal = 4,
}

impl Sector {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn impaction_type(&self) -> ImpactionType {
        match self {
            Sector::Buccal => ImpactionType::BuccallyImpact,
            Sector::MidAlveolar => ImpactionType::MidAlveolar,
            Sector::Palatal => ImpactionType::PalatallyImpact,
            Sector::Outside => ImpactionType::Unknown,
        }
    }
}

impl TryFrom<u8> for Sector {
    type Error = AnalysisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Sector::Outside),
            2 => Ok(Sector::Buccal),
            3 => Ok(Sector::MidAlveolar),
            4 => Ok(Sector::Palatal),
            _ => Err(AnalysisError::InvalidInput(format!(
                "Sector must be within 1..=4, got {}",
                value
            ))),
        }
    }
}

impl From<Sector> for u8 {
    fn from(sector: Sector) -> Self {
        sector.number()
    }
}

impl Display for Sector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sector {}", self.number())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactionType {
    #[serde(rename = "Buccally impact")]
    BuccallyImpact,
    #[serde(rename = "Mid-alveolar")]
    MidAlveolar,
    #[serde(rename = "Palatally impact")]
    PalatallyImpact,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAnalysis {
    pub sector: Sector,
    pub impaction_type: ImpactionType,
}

impl From<Sector> for SectorAnalysis {
    fn from(sector: Sector) -> Self {
        Self {
            sector,
            impaction_type: sector.impaction_type(),
        }
    }
}

/// The three boundaries separating sectors 2, 3 and 4.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorLines {
    pub sector2: Line<f32>,
    pub sector3: Line<f32>,
    pub sector4: Line<f32>,
}

impl SectorLines {
    /// Builds each boundary between the root midpoint and the crown midpoint of
    /// two neighbouring teeth: central/lateral, lateral/canine, canine/first premolar.
    pub fn from_keypoints(keypoints: &KeypointMap, axis: &AxisPoints) -> Result<Self, AnalysisError> {
        let point = |landmark: Landmark| keypoints.point(landmark).ok_or_else(|| missing_point(landmark));

        let central_root = point(axis.central_incisor_root)?;
        let central_crown = point(axis.central_incisor_crown)?;
        let lateral_root = point(axis.lateral_incisor_root)?;
        let lateral_crown = point(axis.lateral_incisor_crown)?;
        let canine_root = point(axis.canine_root)?;
        let canine_crown = point(axis.canine_crown)?;
        let premolar_root = point(axis.first_premolar_root)?;
        let premolar_crown = point(axis.first_premolar_crown)?;

        Ok(SectorLines {
            sector2: Line::between_pairs(&central_root, &lateral_root, &central_crown, &lateral_crown),
            sector3: Line::between_pairs(&lateral_root, &canine_root, &lateral_crown, &canine_crown),
            sector4: Line::between_pairs(&canine_root, &premolar_root, &canine_crown, &premolar_crown),
        })
    }

    /// Ordered half-plane scan of the canine root against the three boundaries.
    pub fn classify(&self, root: &Point<f32>) -> Sector {
        let side2 = self.sector2.implicit().signed_side(root);
        let side3 = self.sector3.implicit().signed_side(root);
        let side4 = self.sector4.implicit().signed_side(root);

        if side2 >= 0.0 && side3 < 0.0 {
            Sector::Buccal
        } else if side3 >= 0.0 && side4 < 0.0 {
            Sector::MidAlveolar
        } else if side4 >= 0.0 {
            Sector::Palatal
        } else {
            Sector::Outside
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::aggregate::Keypoint;
    use crate::detect::landmark::axis_points;
    use cuspid_inference::inference::Side;

    /// Vertical teeth at x = 500/560/620/680 with roots at y = 100 and crowns at y = 300.
    fn arch(canine_root_x: f32) -> KeypointMap {
        let kp = |x: f32, y: f32| Keypoint::new(x, y, 0.9);
        [
            (Landmark::R11, kp(500.0, 100.0)),
            (Landmark::C11, kp(500.0, 300.0)),
            (Landmark::R12, kp(560.0, 100.0)),
            (Landmark::C12, kp(560.0, 300.0)),
            (Landmark::R13, kp(canine_root_x, 100.0)),
            (Landmark::C13, kp(620.0, 300.0)),
            (Landmark::R14, kp(680.0, 100.0)),
            (Landmark::C14, kp(680.0, 300.0)),
        ]
        .into_iter()
        .collect()
    }

    fn sector_for(canine_root_x: f32) -> Sector {
        let axis = axis_points(Side::Right);
        let keypoints = arch(canine_root_x);
        let lines = SectorLines::from_keypoints(&keypoints, &axis).expect("complete arch");
        let root = keypoints.point(axis.canine_root).expect("canine root");
        lines.classify(&root)
    }

    #[test]
    fn root_between_sector2_and_sector3_lines_is_buccal() {
        let sector = sector_for(550.0);
        assert_eq!(sector, Sector::Buccal);
        assert_eq!(sector.impaction_type(), ImpactionType::BuccallyImpact);
    }

    #[test]
    fn root_above_crown_is_mid_alveolar() {
        assert_eq!(sector_for(620.0), Sector::MidAlveolar);
    }

    #[test]
    fn root_past_sector4_line_is_palatal() {
        let sector = sector_for(700.0);
        assert_eq!(sector, Sector::Palatal);
        assert_eq!(sector.impaction_type(), ImpactionType::PalatallyImpact);
    }

    #[test]
    fn root_before_sector2_line_is_outside() {
        let sector = sector_for(500.0);
        assert_eq!(sector, Sector::Outside);
        assert_eq!(sector.impaction_type(), ImpactionType::Unknown);
    }

    #[test]
    fn missing_point_is_reported() {
        let axis = axis_points(Side::Left);
        let result = SectorLines::from_keypoints(&arch(600.0), &axis);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn sector_serializes_as_number() -> anyhow::Result<()> {
        let analysis = SectorAnalysis::from(Sector::Palatal);
        let json = serde_json::to_string(&analysis)?;
        assert_eq!(json, r#"{"sector":4,"impaction_type":"Palatally impact"}"#);
        assert!(serde_json::from_str::<Sector>("5").is_err());
        Ok(())
    }
}
