use crate::detect::analysis::{Annotation, AnnotationData, Describer};

/// Warns when too few of the side's required keypoints were accepted.
#[derive(Debug, Copy, Clone)]
pub struct CoverageDescriber;

impl Describer for CoverageDescriber {
    fn describe(&self, data: &AnnotationData<'_>) -> Option<Annotation> {
        if data.confidence.coverage_ratio >= data.thresholds.coverage_warning {
            return None;
        }

        let coverage = data.confidence.keypoints_detected;
        Some(Annotation::Warning(format!(
            "Only {} of {} required keypoints were detected with sufficient confidence.",
            coverage.found, coverage.required
        )))
    }
}
