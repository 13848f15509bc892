use crate::error::AnalysisError;
use bitvec::prelude::*;
use cuspid_inference::inference::Side;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

// Quadrant digits follow FDI numbering: 1x is the upper right, 2x the upper left.
define_landmarks![
    C11 => "c11",
    C12 => "c12",
    C13 => "c13",
    C14 => "c14",
    C15 => "c15",
    C21 => "c21",
    C22 => "c22",
    C23 => "c23",
    C24 => "c24",
    C25 => "c25",
    M1 => "m1",
    M2 => "m2",
    Mb16 => "mb16",
    Mb26 => "mb26",
    R11 => "r11",
    R12 => "r12",
    R13 => "r13",
    R14 => "r14",
    R15 => "r15",
    R21 => "r21",
    R22 => "r22",
    R23 => "r23",
    R24 => "r24",
    R25 => "r25",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tooth {
    CentralIncisor,
    LateralIncisor,
    Canine,
    FirstPremolar,
    SecondPremolar,
}

impl Landmark {
    pub fn root(side: Side, tooth: Tooth) -> Landmark {
        use Landmark::*;
        match (side, tooth) {
            (Side::Right, Tooth::CentralIncisor) => R11,
            (Side::Right, Tooth::LateralIncisor) => R12,
            (Side::Right, Tooth::Canine) => R13,
            (Side::Right, Tooth::FirstPremolar) => R14,
            (Side::Right, Tooth::SecondPremolar) => R15,
            (Side::Left, Tooth::CentralIncisor) => R21,
            (Side::Left, Tooth::LateralIncisor) => R22,
            (Side::Left, Tooth::Canine) => R23,
            (Side::Left, Tooth::FirstPremolar) => R24,
            (Side::Left, Tooth::SecondPremolar) => R25,
        }
    }

    pub fn crown(side: Side, tooth: Tooth) -> Landmark {
        use Landmark::*;
        match (side, tooth) {
            (Side::Right, Tooth::CentralIncisor) => C11,
            (Side::Right, Tooth::LateralIncisor) => C12,
            (Side::Right, Tooth::Canine) => C13,
            (Side::Right, Tooth::FirstPremolar) => C14,
            (Side::Right, Tooth::SecondPremolar) => C15,
            (Side::Left, Tooth::CentralIncisor) => C21,
            (Side::Left, Tooth::LateralIncisor) => C22,
            (Side::Left, Tooth::Canine) => C23,
            (Side::Left, Tooth::FirstPremolar) => C24,
            (Side::Left, Tooth::SecondPremolar) => C25,
        }
    }

    pub fn molar_buccal(side: Side) -> Landmark {
        match side {
            Side::Right => Landmark::Mb16,
            Side::Left => Landmark::Mb26,
        }
    }

    /// Sextant of a root or crown point. Midline and molar landmarks have none.
    pub fn sextant_side(&self) -> Option<Side> {
        use Landmark::*;
        match self {
            C11 | C12 | C13 | C14 | C15 | R11 | R12 | R13 | R14 | R15 => Some(Side::Right),
            C21 | C22 | C23 | C24 | C25 | R21 | R22 | R23 | R24 | R25 => Some(Side::Left),
            M1 | M2 | Mb16 | Mb26 => None,
        }
    }
}

impl Display for Landmark {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Landmark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Landmark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// The landmarks that describe one side of the arch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisPoints {
    pub side: Side,
    pub central_incisor_root: Landmark,
    pub central_incisor_crown: Landmark,
    pub lateral_incisor_root: Landmark,
    pub lateral_incisor_crown: Landmark,
    pub canine_root: Landmark,
    pub canine_crown: Landmark,
    pub first_premolar_root: Landmark,
    pub first_premolar_crown: Landmark,
    pub second_premolar_root: Landmark,
    pub second_premolar_crown: Landmark,
    pub molar_buccal: Landmark,
    pub midline_start: Landmark,
    pub midline_end: Landmark,
}

pub fn axis_points(side: Side) -> AxisPoints {
    AxisPoints {
        side,
        central_incisor_root: Landmark::root(side, Tooth::CentralIncisor),
        central_incisor_crown: Landmark::crown(side, Tooth::CentralIncisor),
        lateral_incisor_root: Landmark::root(side, Tooth::LateralIncisor),
        lateral_incisor_crown: Landmark::crown(side, Tooth::LateralIncisor),
        canine_root: Landmark::root(side, Tooth::Canine),
        canine_crown: Landmark::crown(side, Tooth::Canine),
        first_premolar_root: Landmark::root(side, Tooth::FirstPremolar),
        first_premolar_crown: Landmark::crown(side, Tooth::FirstPremolar),
        second_premolar_root: Landmark::root(side, Tooth::SecondPremolar),
        second_premolar_crown: Landmark::crown(side, Tooth::SecondPremolar),
        molar_buccal: Landmark::molar_buccal(side),
        midline_start: Landmark::M1,
        midline_end: Landmark::M2,
    }
}

impl AxisPoints {
    /// Points that must all be present before any geometry is computed.
    pub fn minimal_set(&self) -> [Landmark; 10] {
        [
            self.canine_root,
            self.canine_crown,
            self.lateral_incisor_root,
            self.lateral_incisor_crown,
            self.central_incisor_root,
            self.central_incisor_crown,
            self.first_premolar_root,
            self.first_premolar_crown,
            self.midline_start,
            self.midline_end,
        ]
    }

    /// Points counted for the coverage ratio of this side.
    pub fn required_set(&self) -> [Landmark; 13] {
        [
            self.midline_start,
            self.midline_end,
            self.central_incisor_root,
            self.lateral_incisor_root,
            self.canine_root,
            self.first_premolar_root,
            self.second_premolar_root,
            self.central_incisor_crown,
            self.lateral_incisor_crown,
            self.canine_crown,
            self.first_premolar_crown,
            self.second_premolar_crown,
            self.molar_buccal,
        ]
    }

    /// Points whose absence lowers the overall detection confidence.
    pub fn critical_set(&self) -> [Landmark; 4] {
        [
            self.midline_start,
            self.midline_end,
            self.canine_root,
            self.canine_crown,
        ]
    }
}

/// Maps each detector row index to the landmark it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkVocabulary(Vec<Landmark>);

impl Default for LandmarkVocabulary {
    fn default() -> Self {
        LandmarkVocabulary(Landmark::ALL.to_vec())
    }
}

impl LandmarkVocabulary {
    /// Vocabulary from labels listed in index order. Each landmark may be
    /// listed once.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, AnalysisError> {
        let landmarks = labels
            .iter()
            .map(|label| label.as_ref().parse())
            .collect::<Result<Vec<Landmark>, _>>()?;

        let mut seen = bitvec![0; Landmark::COUNT];
        for landmark in &landmarks {
            if seen.replace(landmark.index(), true) {
                return Err(AnalysisError::DuplicateLabel(*landmark));
            }
        }
        Ok(LandmarkVocabulary(landmarks))
    }

    /// Vocabulary from an index → label mapping. Indices must run densely from zero.
    pub fn from_indexed(labels: &BTreeMap<usize, String>) -> Result<Self, AnalysisError> {
        if let Some((position, (index, _))) = labels
            .iter()
            .enumerate()
            .find(|(position, (index, _))| position != *index)
        {
            debug!("Vocabulary index {} found at position {}", index, position);
            return Err(AnalysisError::VocabularyGap(position));
        }
        let ordered = labels.values().collect::<Vec<_>>();
        Self::from_labels(ordered.as_slice())
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(Landmark::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for landmark in Landmark::ALL {
            assert_eq!(landmark.as_str().parse::<Landmark>().ok(), Some(*landmark));
        }
        assert_eq!(Landmark::COUNT, 24);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let parsed = "r16".parse::<Landmark>();
        assert!(matches!(parsed, Err(AnalysisError::UnknownLabel(label)) if label == "r16"));
    }

    #[test]
    fn default_vocabulary_follows_detector_order() {
        let vocabulary = LandmarkVocabulary::default();
        assert_eq!(vocabulary.get(0), Some(Landmark::C11));
        assert_eq!(vocabulary.get(10), Some(Landmark::M1));
        assert_eq!(vocabulary.get(12), Some(Landmark::Mb16));
        assert_eq!(vocabulary.get(16), Some(Landmark::R13));
        assert_eq!(vocabulary.get(23), Some(Landmark::R25));
        assert_eq!(vocabulary.get(24), None);
    }

    #[test]
    fn indexed_vocabulary_must_be_dense() {
        let mut labels = BTreeMap::new();
        labels.insert(0, "m1".to_string());
        labels.insert(2, "m2".to_string());
        assert!(matches!(
            LandmarkVocabulary::from_indexed(&labels),
            Err(AnalysisError::VocabularyGap(1))
        ));

        labels.insert(1, "r13".to_string());
        let vocabulary = LandmarkVocabulary::from_indexed(&labels).expect("dense vocabulary");
        assert_eq!(vocabulary.get(1), Some(Landmark::R13));
        assert_eq!(vocabulary.len(), 3);
    }

    #[test]
    fn repeated_label_is_rejected() {
        let mut labels = Landmark::ALL.iter().map(Landmark::as_str).collect::<Vec<_>>();
        labels[Landmark::Mb26.index()] = "m1";
        assert_eq!(
            LandmarkVocabulary::from_labels(labels.as_slice()),
            Err(AnalysisError::DuplicateLabel(Landmark::M1))
        );

        let indexed = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (index, label.to_string()))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(
            LandmarkVocabulary::from_indexed(&indexed),
            Err(AnalysisError::DuplicateLabel(Landmark::M1))
        );
    }

    #[test]
    fn axis_points_are_side_symmetric() {
        let right = axis_points(Side::Right);
        let left = axis_points(Side::Left);
        assert_eq!(right.canine_root, Landmark::R13);
        assert_eq!(left.canine_crown, Landmark::C23);
        assert_eq!(left.molar_buccal, Landmark::Mb26);
        assert_eq!(right.midline_end, left.midline_end);
        assert!(right
            .required_set()
            .iter()
            .all(|l| l.sextant_side() != Some(Side::Left)));
    }

    #[test]
    fn sextant_side_ignores_midline_and_molars() {
        assert_eq!(Landmark::R12.sextant_side(), Some(Side::Right));
        assert_eq!(Landmark::C24.sextant_side(), Some(Side::Left));
        assert_eq!(Landmark::Mb16.sextant_side(), None);
        assert_eq!(Landmark::M2.sextant_side(), None);
    }
}
