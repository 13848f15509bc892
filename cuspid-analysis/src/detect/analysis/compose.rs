use crate::detect::analysis::{Annotation, AnnotationData, Describer, DescriberDispatcher};

/// Remarks collected for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub warnings: Vec<String>,
    pub note: Option<String>,
}

pub struct CompositeDescriber {
    describers: Vec<DescriberDispatcher>,
}

impl Default for CompositeDescriber {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeDescriber {
    pub fn new() -> Self {
        CompositeDescriber {
            describers: DescriberDispatcher::all(),
        }
    }

    /// Runs every describer. Warnings accumulate in describer order; the last
    /// note wins.
    pub fn describe(&self, data: &AnnotationData<'_>) -> Annotations {
        let mut annotations = Annotations::default();

        for annotation in self.describers.iter().filter_map(|d| d.describe(data)) {
            match annotation {
                Annotation::Warning(text) => annotations.warnings.push(text),
                Annotation::Note(text) => annotations.note = Some(text),
            }
        }

        annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::aggregate::Coverage;
    use crate::detect::config::AnalysisThresholds;
    use crate::detect::property::analyse_result::ConfidenceSummary;
    use crate::detect::property::sector::{Sector, SectorAnalysis};

    fn describe(confidence: f32, found: usize, sector: Option<Sector>) -> Annotations {
        let summary = ConfidenceSummary::new(confidence, Coverage { found, required: 13 });
        let sector = sector.map(SectorAnalysis::from);
        let thresholds = AnalysisThresholds::default();
        CompositeDescriber::new().describe(&AnnotationData {
            confidence: &summary,
            sector: sector.as_ref(),
            thresholds: &thresholds,
        })
    }

    #[test]
    fn confident_complete_detection_has_no_remarks() {
        assert_eq!(describe(0.9, 13, Some(Sector::Buccal)), Annotations::default());
    }

    #[test]
    fn both_warnings_are_kept() {
        let annotations = describe(0.3, 6, None);
        assert_eq!(
            annotations.warnings,
            vec![
                "Low confidence detection. Results may not be accurate.".to_string(),
                "Only 6 of 13 required keypoints were detected with sufficient confidence."
                    .to_string(),
            ]
        );
        assert_eq!(annotations.note, None);
    }

    #[test]
    fn coverage_boundary_is_exclusive() {
        // 10/13 ≈ 0.77 is fine, 9/13 ≈ 0.69 is not
        assert!(describe(0.9, 10, None).warnings.is_empty());
        assert_eq!(describe(0.9, 9, None).warnings.len(), 1);
    }

    #[test]
    fn palatal_sector_gets_surgical_note() {
        let annotations = describe(0.9, 13, Some(Sector::Palatal));
        assert_eq!(
            annotations.note.as_deref(),
            Some("Palatally impacted canines in sector 4 typically require surgical intervention.")
        );
    }
}
