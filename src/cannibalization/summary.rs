use crate::cannibalization::DetectedCannibalization;
use crate::data::ClientNode;
use crate::stats::{self, round_to};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Headline figures over a set of detected cases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CannibalizationSummary {
    pub case_count: usize,
    pub total_volume_lost: f64,
    pub total_volume_gained: f64,
    pub net_balance: f64,
    /// Mean substitution rate across cases, in percent
    pub avg_substitution_rate: f64,
    /// Cases where the cannibal recovered at least the lost volume
    pub fully_substituted: usize,
}

pub fn summarize(cases: &[DetectedCannibalization]) -> CannibalizationSummary {
    if cases.is_empty() {
        return CannibalizationSummary::default();
    }

    let lost: f64 = cases.iter().map(|c| c.volume_lost).sum();
    let gained: f64 = cases.iter().map(|c| c.volume_gained).sum();
    let rates: Vec<f64> = cases.iter().map(|c| c.substitution_rate).collect();

    CannibalizationSummary {
        case_count: cases.len(),
        total_volume_lost: round_to(lost, 2),
        total_volume_gained: round_to(gained, 2),
        net_balance: round_to(gained - lost, 2),
        avg_substitution_rate: round_to(stats::mean(&rates), 1),
        fully_substituted: cases.iter().filter(|c| c.substitution_rate >= 100.0).count(),
    }
}

/// Distinct family names present in the input, sorted
pub fn available_families(data: &[ClientNode]) -> Vec<String> {
    data.iter()
        .flat_map(|client| client.families.iter().map(|f| f.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
