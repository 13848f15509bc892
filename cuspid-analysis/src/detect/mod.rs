#[macro_use]
mod landmark_macro;

pub mod aggregate;
pub mod analysis;
pub mod analyzer;
pub mod assessment;
pub mod config;
pub mod landmark;
pub mod predict;
pub mod property;
pub mod request;

// --- Keypoint aggregation ---
/// A keypoint is kept only when its visibility score is strictly above this.
pub(crate) const KEYPOINT_ACCEPTANCE_THRESHOLD: f32 = 0.2;
/// Band that the box confidence is clamped into when the pose head has no visibility channel.
pub(crate) const DEFAULT_CONFIDENCE_MIN: f32 = 0.5;
pub(crate) const DEFAULT_CONFIDENCE_MAX: f32 = 0.7;
/// Box confidence assumed when the detector reports none.
pub(crate) const MISSING_BOX_CONFIDENCE: f32 = 0.7;
/// Overall confidence is scaled by `base + weight * completeness`.
pub(crate) const COMPLETENESS_BASE: f32 = 0.7;
pub(crate) const COMPLETENESS_WEIGHT: f32 = 0.3;
/// Multiplier applied when a midline or canine point is missing.
pub(crate) const CRITICAL_MISSING_PENALTY: f32 = 0.8;

// --- Angle cutoffs (degrees) ---
pub(crate) const MIDLINE_ANGLE_LIMIT: f32 = 31.0;
pub(crate) const LATERAL_ANGLE_LIMIT: f32 = 51.47;
pub(crate) const OCCLUSAL_ANGLE_LIMIT: f32 = 132.0;

/// Horizontal root/crown offset (pixels) under which the root sits above the canine.
pub(crate) const ROOT_POSITION_TOLERANCE_PX: f32 = 10.0;

// --- Annotations ---
pub(crate) const LOW_CONFIDENCE_WARNING: f32 = 0.4;
pub(crate) const COVERAGE_WARNING: f32 = 0.7;

// --- Scoring ---
pub(crate) const PALATAL_WEIGHT: u32 = 2;
pub(crate) const MID_ALVEOLAR_WEIGHT: u32 = 1;
pub(crate) const SEVERE_FACTOR_COUNT: u32 = 3;
pub(crate) const IMPACTED_FACTOR_COUNT: u32 = 1;

// --- Segmentation clean-up ---
/// Same-class findings overlapping more than this are treated as duplicates.
pub(crate) const SEGMENTATION_IOU_THRESHOLD: f32 = 0.7;
pub(crate) const SEGMENTATION_MIN_CONFIDENCE: f32 = 0.0;
