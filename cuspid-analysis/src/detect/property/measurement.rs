use crate::detect::aggregate::KeypointMap;
use crate::detect::config::AnalysisThresholds;
use crate::detect::landmark::{AxisPoints, Landmark};
use crate::detect::property::line::Line;
use crate::detect::property::missing_point;
use crate::error::AnalysisError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Verdict shared by angle measurements and the canine assessment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Favorable,
    Unfavorable,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Difficulty {
    pub fn is_unfavorable(&self) -> bool {
        matches!(self, Difficulty::Unfavorable)
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Difficulty::Favorable => "Favorable",
            Difficulty::Unfavorable => "Unfavorable",
            Difficulty::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    /// Degrees, within `[0, 180]`
    pub value: f32,
    pub difficulty: Difficulty,
}

impl AngleMeasurement {
    /// Angles strictly above `limit` are unfavorable.
    pub fn graded(value: f32, limit: f32) -> Self {
        let difficulty = if value > limit {
            Difficulty::Unfavorable
        } else {
            Difficulty::Favorable
        };
        Self { value, difficulty }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_with_midline: Option<AngleMeasurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_with_lateral: Option<AngleMeasurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_with_occlusal: Option<AngleMeasurement>,
}

impl AngleMeasurements {
    pub fn iter(&self) -> impl Iterator<Item = &AngleMeasurement> {
        [
            &self.angle_with_midline,
            &self.angle_with_lateral,
            &self.angle_with_occlusal,
        ]
        .into_iter()
        .flatten()
    }

    pub fn unfavorable_count(&self) -> u32 {
        self.iter()
            .filter(|angle| angle.difficulty.is_unfavorable())
            .count() as u32
    }
}

/// Perpendicular distances from the canine crown, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distances {
    pub to_occlusal: f32,
    pub to_midline: f32,
}

/// Axes, angles and distances of one side. Only available when the side's
/// molar buccal point was detected, since the occlusal plane needs it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurements {
    pub canine_axis: Line<f32>,
    pub lateral_axis: Line<f32>,
    pub occlusal_plane: Line<f32>,
    pub angles: AngleMeasurements,
    pub distances: Distances,
}

fn line_of(keypoints: &KeypointMap, start: Landmark, end: Landmark) -> Result<Line<f32>, AnalysisError> {
    let point = |landmark: Landmark| keypoints.point(landmark).ok_or_else(|| missing_point(landmark));
    Ok(Line::new(point(start)?, point(end)?))
}

/// Midline from `m1` to `m2`.
pub fn midline(keypoints: &KeypointMap, axis: &AxisPoints) -> Result<Line<f32>, AnalysisError> {
    line_of(keypoints, axis.midline_start, axis.midline_end)
}

impl Measurements {
    /// Returns `Ok(None)` when the molar buccal point is missing.
    pub fn measure(
        keypoints: &KeypointMap,
        axis: &AxisPoints,
        thresholds: &AnalysisThresholds,
    ) -> Result<Option<Self>, AnalysisError> {
        if !keypoints.contains(axis.molar_buccal) {
            debug!(
                "No {} on {} side, skipping angle measurements",
                axis.molar_buccal, axis.side
            );
            return Ok(None);
        }

        let midline = midline(keypoints, axis)?;
        let canine_axis = line_of(keypoints, axis.canine_root, axis.canine_crown)?;
        let lateral_axis = line_of(keypoints, axis.lateral_incisor_root, axis.lateral_incisor_crown)?;
        let occlusal_plane = line_of(keypoints, axis.midline_end, axis.molar_buccal)?;

        let graded = |other: &Line<f32>, limit: f32| {
            canine_axis
                .angle_between(other)
                .map(|value| AngleMeasurement::graded(value, limit))
        };

        let angles = AngleMeasurements {
            angle_with_midline: graded(&midline, thresholds.midline_angle_limit),
            angle_with_lateral: graded(&lateral_axis, thresholds.lateral_angle_limit),
            angle_with_occlusal: graded(&occlusal_plane, thresholds.occlusal_angle_limit),
        };

        let crown = canine_axis.end;
        let distances = Distances {
            to_occlusal: occlusal_plane.distance_to(&crown),
            to_midline: midline.distance_to(&crown),
        };

        Ok(Some(Measurements {
            canine_axis,
            lateral_axis,
            occlusal_plane,
            angles,
            distances,
        }))
    }
}
