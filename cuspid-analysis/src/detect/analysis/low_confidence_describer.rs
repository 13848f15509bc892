use crate::detect::analysis::{Annotation, AnnotationData, Describer};

#[derive(Debug, Copy, Clone)]
pub struct LowConfidenceDescriber;

impl Describer for LowConfidenceDescriber {
    fn describe(&self, data: &AnnotationData<'_>) -> Option<Annotation> {
        if data.confidence.overall_confidence < data.thresholds.low_confidence_warning {
            Some(Annotation::Warning(
                "Low confidence detection. Results may not be accurate.".to_string(),
            ))
        } else {
            None
        }
    }
}
