//! Difficulty scoring and the final impaction label

use crate::detect::assessment::CanineAssessment;
use crate::detect::config::AnalysisThresholds;
use crate::detect::property::measurement::AngleMeasurements;
use crate::detect::property::sector::{ImpactionType, SectorAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prediction {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "impacted")]
    Impacted,
    #[serde(rename = "severely impacted")]
    SeverelyImpacted,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Normal => "normal",
            Prediction::Impacted => "impacted",
            Prediction::SeverelyImpacted => "severely impacted",
            Prediction::Unknown => "unknown",
        }
    }

    pub fn from_factors(factors: u32, thresholds: &AnalysisThresholds) -> Self {
        if factors >= thresholds.severe_factor_count {
            Prediction::SeverelyImpacted
        } else if factors >= thresholds.impacted_factor_count {
            Prediction::Impacted
        } else {
            Prediction::Normal
        }
    }

    /// Worst label over all analyzed sides. Sides that could not be analyzed
    /// only count when no side could.
    pub fn reduce(predictions: impl IntoIterator<Item = Prediction>) -> Prediction {
        predictions
            .into_iter()
            .max_by_key(|prediction| match prediction {
                Prediction::Unknown => 0,
                Prediction::Normal => 1,
                Prediction::Impacted => 2,
                Prediction::SeverelyImpacted => 3,
            })
            .unwrap_or(Prediction::Unknown)
    }
}

impl Display for Prediction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tallies the evidence against a spontaneous eruption.
pub fn difficult_factors(
    sector: &SectorAnalysis,
    assessment: &CanineAssessment,
    angles: Option<&AngleMeasurements>,
    thresholds: &AnalysisThresholds,
) -> u32 {
    let mut factors = match sector.impaction_type {
        ImpactionType::PalatallyImpact => thresholds.palatal_weight,
        ImpactionType::MidAlveolar => thresholds.mid_alveolar_weight,
        ImpactionType::BuccallyImpact | ImpactionType::Unknown => 0,
    };

    if assessment.eruption_difficulty.is_unfavorable() {
        factors += 1;
    }
    if let Some(angles) = angles {
        factors += angles.unfavorable_count();
    }
    factors
}
