use crate::data::ClientVolume;
use crate::segmentation::MetricUnit;
use crate::stats;
use serde::{Deserialize, Serialize};

/// IQR multiplier for the outlier fences
const OUTLIER_IQR_FACTOR: f64 = 1.5;

/// A client whose volume falls outside the Tukey fences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlier {
    pub client_id: String,
    pub client_name: String,
    pub value: f64,
}

/// Descriptive statistics of the client volume distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStatistics {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    /// Q1, Q2, Q3
    pub quartiles: [f64; 3],
    pub outliers: Vec<Outlier>,
    pub unit: MetricUnit,
}

impl SegmentationStatistics {
    pub fn empty(unit: MetricUnit) -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            variance: 0.0,
            min: 0.0,
            max: 0.0,
            quartiles: [0.0; 3],
            outliers: Vec::new(),
            unit,
        }
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.quartiles[2] - self.quartiles[0]
    }
}

/// Compute statistics over clients ranked by descending volume
///
/// Outliers are reported in ranking order, largest first.
pub fn compute(ranked: &[&ClientVolume], unit: MetricUnit) -> SegmentationStatistics {
    if ranked.is_empty() {
        return SegmentationStatistics::empty(unit);
    }

    let ascending: Vec<f64> = ranked.iter().rev().map(|c| c.volume).collect();
    let variance = stats::population_variance(&ascending);
    let quartiles = stats::quartiles(&ascending);
    let (low, high) = stats::tukey_fences(quartiles[0], quartiles[2], OUTLIER_IQR_FACTOR);

    let outliers = ranked
        .iter()
        .filter(|c| c.volume < low || c.volume > high)
        .map(|c| Outlier {
            client_id: c.id.clone(),
            client_name: c.name.clone(),
            value: c.volume,
        })
        .collect();

    SegmentationStatistics {
        count: ascending.len(),
        sum: ascending.iter().sum(),
        mean: stats::mean(&ascending),
        median: stats::median(&ascending),
        std_dev: variance.sqrt(),
        variance,
        min: ascending[0],
        max: ascending[ascending.len() - 1],
        quartiles,
        outliers,
        unit,
    }
}
