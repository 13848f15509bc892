use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView1, Axis};

/// Whether the pose head reported a visibility score next to each point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeypointChannels {
    Coordinates,
    WithConfidence,
}

/// Raw output of the pose detector for one instance: one row per landmark,
/// columns `x, y` and optionally `confidence`.
#[derive(Debug, Clone)]
pub struct KeypointDetection {
    pub keypoints: Array2<f32>,
    pub box_confidence: Option<f32>,
}

impl KeypointDetection {
    pub fn new(keypoints: Array2<f32>, box_confidence: Option<f32>) -> Result<Self> {
        ensure!(
            keypoints.ncols() >= 2,
            "Keypoint tensor needs at least x and y columns, got {}",
            keypoints.ncols()
        );
        Ok(Self {
            keypoints,
            box_confidence,
        })
    }

    /// Builds a detection from nested rows, as they arrive in JSON payloads.
    pub fn from_rows(rows: &[Vec<f32>], box_confidence: Option<f32>) -> Result<Self> {
        let columns = rows.first().map_or(2, Vec::len);
        ensure!(
            rows.iter().all(|row| row.len() == columns),
            "Keypoint rows have inconsistent widths"
        );

        let flat = rows.iter().flatten().copied().collect::<Vec<_>>();
        let keypoints = Array2::from_shape_vec((rows.len(), columns), flat)?;

        Self::new(keypoints, box_confidence)
    }

    pub fn channels(&self) -> KeypointChannels {
        if self.keypoints.ncols() >= 3 {
            KeypointChannels::WithConfidence
        } else {
            KeypointChannels::Coordinates
        }
    }

    pub fn len(&self) -> usize {
        self.keypoints.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.nrows() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f32>> {
        self.keypoints.axis_iter(Axis(0))
    }
}
