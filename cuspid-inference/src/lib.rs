//! Detector-output contract for the canine impaction analysis: keypoint
//! tensors, tooth segmentation findings and the plane geometry they share.

pub mod inference;
pub mod utils;
