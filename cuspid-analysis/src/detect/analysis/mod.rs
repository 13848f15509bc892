pub mod compose;
mod coverage_describer;
mod low_confidence_describer;
mod palatal_sector_describer;
#[macro_use]
mod dispatch_macro;

use crate::detect::analysis::coverage_describer::CoverageDescriber;
use crate::detect::analysis::low_confidence_describer::LowConfidenceDescriber;
use crate::detect::analysis::palatal_sector_describer::PalatalSectorDescriber;
use crate::detect::config::AnalysisThresholds;
use crate::detect::property::analyse_result::ConfidenceSummary;
use crate::detect::property::sector::SectorAnalysis;

/// Facts about one side that the describers comment on.
#[derive(Debug, Copy, Clone)]
pub struct AnnotationData<'a> {
    pub confidence: &'a ConfidenceSummary,
    pub sector: Option<&'a SectorAnalysis>,
    pub thresholds: &'a AnalysisThresholds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Warning(String),
    Note(String),
}

/// Produces one remark about a side's analysis, if it applies.
pub trait Describer {
    fn describe(&self, data: &AnnotationData<'_>) -> Option<Annotation>;
}

define_describer![
    LowConfidence => LowConfidenceDescriber,
    Coverage => CoverageDescriber,
    PalatalSector => PalatalSectorDescriber,
];
