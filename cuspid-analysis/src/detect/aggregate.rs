use crate::detect::config::AnalysisThresholds;
use crate::detect::landmark::{axis_points, Landmark, LandmarkVocabulary};
use crate::error::AnalysisError;
use bitvec::prelude::*;
use cuspid_inference::inference::keypoint::{KeypointChannels, KeypointDetection};
use cuspid_inference::inference::Side;
use cuspid_inference::utils::graph::Point;
use hashbrown::HashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    pub fn point(&self) -> Point<f32> {
        Point::new(self.x, self.y)
    }
}

/// Wire form of one map entry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledKeypoint {
    pub label: Landmark,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// Accepted keypoints of one detection, keyed by landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LabeledKeypoint>", into = "Vec<LabeledKeypoint>")]
pub struct KeypointMap {
    points: HashMap<Landmark, Keypoint>,
    present: BitVec,
}

impl Default for KeypointMap {
    fn default() -> Self {
        Self {
            points: HashMap::new(),
            present: bitvec![0; Landmark::COUNT],
        }
    }
}

impl FromIterator<(Landmark, Keypoint)> for KeypointMap {
    fn from_iter<I: IntoIterator<Item = (Landmark, Keypoint)>>(iter: I) -> Self {
        let mut map = KeypointMap::default();
        for (landmark, keypoint) in iter {
            map.insert(landmark, keypoint);
        }
        map
    }
}

impl From<Vec<LabeledKeypoint>> for KeypointMap {
    fn from(entries: Vec<LabeledKeypoint>) -> Self {
        entries
            .into_iter()
            .map(|entry| {
                (
                    entry.label,
                    Keypoint::new(entry.x, entry.y, entry.confidence),
                )
            })
            .collect()
    }
}

impl From<KeypointMap> for Vec<LabeledKeypoint> {
    fn from(map: KeypointMap) -> Self {
        map.iter()
            .map(|(label, keypoint)| LabeledKeypoint {
                label,
                x: keypoint.x,
                y: keypoint.y,
                confidence: keypoint.confidence,
            })
            .collect()
    }
}

impl KeypointMap {
    fn insert(&mut self, landmark: Landmark, keypoint: Keypoint) {
        self.present.set(landmark.index(), true);
        self.points.insert(landmark, keypoint);
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.points.get(&landmark)
    }

    pub fn point(&self, landmark: Landmark) -> Option<Point<f32>> {
        self.get(landmark).map(Keypoint::point)
    }

    pub fn contains(&self, landmark: Landmark) -> bool {
        self.present[landmark.index()]
    }

    /// The given landmarks that were not detected, in the order asked for.
    pub fn missing(&self, landmarks: &[Landmark]) -> Vec<Landmark> {
        landmarks
            .iter()
            .copied()
            .filter(|landmark| !self.contains(*landmark))
            .collect()
    }

    pub fn count_present(&self, landmarks: &[Landmark]) -> usize {
        landmarks
            .iter()
            .filter(|landmark| self.contains(**landmark))
            .count()
    }

    pub fn len(&self) -> usize {
        self.present.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.present.not_any()
    }

    /// Entries in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &Keypoint)> + '_ {
        self.present
            .iter_ones()
            .map(|index| Landmark::ALL[index])
            .filter_map(|landmark| self.points.get(&landmark).map(|kp| (landmark, kp)))
    }
}

/// How many of a side's required landmarks were detected, written `found/required`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coverage {
    pub found: usize,
    pub required: usize,
}

impl Coverage {
    pub fn ratio(&self) -> f32 {
        if self.required == 0 {
            return 0.0;
        }
        self.found as f32 / self.required as f32
    }
}

impl Display for Coverage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.found, self.required)
    }
}

impl FromStr for Coverage {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidInput(format!("Malformed coverage: {}", s));
        let (found, required) = s.split_once('/').ok_or_else(invalid)?;
        Ok(Coverage {
            found: found.trim().parse().map_err(|_| invalid())?,
            required: required.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for Coverage {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coverage> for String {
    fn from(coverage: Coverage) -> Self {
        coverage.to_string()
    }
}

/// Normalized detector output: labelled points, their pooled confidence and
/// the side with the most root/crown evidence.
#[derive(Debug, Clone)]
pub struct AggregatedKeypoints {
    pub keypoints: KeypointMap,
    /// Mean accepted confidence scaled by completeness, before any critical penalty
    pub pooled_confidence: f32,
    /// Confidence for the selected side
    pub overall_confidence: f32,
    pub detected: usize,
    pub expected: usize,
    pub side: Side,
}

impl AggregatedKeypoints {
    /// Labels the detector rows, filters them by confidence and scores the detection.
    ///
    /// Fails with [`AnalysisError::DetectionEmpty`] when no point survives and
    /// with a vocabulary error when labels and rows do not line up.
    pub fn aggregate(
        detection: &KeypointDetection,
        vocabulary: &LandmarkVocabulary,
        thresholds: &AnalysisThresholds,
    ) -> Result<Self, AnalysisError> {
        if detection.is_empty() {
            return Err(AnalysisError::DetectionEmpty);
        }
        if vocabulary.len() != detection.len() {
            return Err(AnalysisError::VocabularyMismatch {
                labels: vocabulary.len(),
                keypoints: detection.len(),
            });
        }

        let channels = detection.channels();
        let default_confidence = detection
            .box_confidence
            .unwrap_or(thresholds.missing_box_confidence)
            .max(thresholds.default_confidence_min)
            .min(thresholds.default_confidence_max);

        let mut keypoints = KeypointMap::default();
        let mut confidence_sum = 0.0;

        for (index, row) in detection.rows().enumerate() {
            let Some(landmark) = vocabulary.get(index) else {
                continue;
            };
            let (x, y) = (row[0], row[1]);
            if !x.is_finite() || !y.is_finite() {
                debug!("Skipping {} with non-finite coordinates", landmark);
                continue;
            }

            let confidence = match channels {
                KeypointChannels::Coordinates => default_confidence,
                KeypointChannels::WithConfidence => {
                    let confidence = row[2].max(0.0).min(1.0);
                    if confidence <= thresholds.keypoint_acceptance {
                        continue;
                    }
                    confidence
                }
            };

            confidence_sum += confidence;
            keypoints.insert(landmark, Keypoint::new(x, y, confidence));
        }

        if keypoints.is_empty() {
            return Err(AnalysisError::DetectionEmpty);
        }

        let detected = keypoints.len();
        let expected = vocabulary.len();
        let side = select_side(&keypoints);
        info!("Analyzing {} side based on keypoint availability", side);

        let completeness = (detected as f32 / expected as f32).min(1.0);
        let pooled_confidence = confidence_sum / detected as f32
            * (thresholds.completeness_base + thresholds.completeness_weight * completeness);
        let overall_confidence = side_confidence(&keypoints, pooled_confidence, side, thresholds);

        Ok(AggregatedKeypoints {
            keypoints,
            pooled_confidence,
            overall_confidence,
            detected,
            expected,
            side,
        })
    }

    /// Detection confidence as seen from `side`: penalized when that side's
    /// critical landmarks are incomplete.
    pub fn confidence(&self, side: Side, thresholds: &AnalysisThresholds) -> f32 {
        side_confidence(&self.keypoints, self.pooled_confidence, side, thresholds)
    }

    pub fn coverage(&self, side: Side) -> Coverage {
        let required = axis_points(side).required_set();
        Coverage {
            found: self.keypoints.count_present(&required),
            required: required.len(),
        }
    }
}

fn side_confidence(
    keypoints: &KeypointMap,
    pooled: f32,
    side: Side,
    thresholds: &AnalysisThresholds,
) -> f32 {
    let critical = axis_points(side).critical_set();
    let confidence = if keypoints.missing(&critical).is_empty() {
        pooled
    } else {
        debug!("Critical landmarks missing on {} side", side);
        pooled * thresholds.critical_missing_penalty
    };
    confidence.max(0.0).min(1.0)
}

/// Picks the side with more detected root/crown points. Ties go to the right.
pub fn select_side(keypoints: &KeypointMap) -> Side {
    let (right, left) = keypoints
        .iter()
        .fold((0, 0), |(right, left), (landmark, _)| {
            match landmark.sextant_side() {
                Some(Side::Right) => (right + 1, left),
                Some(Side::Left) => (right, left + 1),
                None => (right, left),
            }
        });

    if right >= left {
        Side::Right
    } else {
        Side::Left
    }
}
