use crate::detect::analysis::{Annotation, AnnotationData, Describer};
use crate::detect::property::sector::{ImpactionType, Sector};

#[derive(Debug, Copy, Clone)]
pub struct PalatalSectorDescriber;

impl Describer for PalatalSectorDescriber {
    fn describe(&self, data: &AnnotationData<'_>) -> Option<Annotation> {
        let sector = data.sector?;
        if sector.sector == Sector::Palatal && sector.impaction_type == ImpactionType::PalatallyImpact {
            Some(Annotation::Note(
                "Palatally impacted canines in sector 4 typically require surgical intervention."
                    .to_string(),
            ))
        } else {
            None
        }
    }
}
