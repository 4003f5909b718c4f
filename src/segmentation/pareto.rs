use crate::data::ClientVolume;
use crate::stats::gini_coefficient;
use serde::{Deserialize, Serialize};

/// Relative slack when comparing the running sum against the target share
const CUMULATIVE_TOLERANCE: f64 = 1e-9;

/// Clients left outside the Pareto prefix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomClients {
    pub count: usize,
    pub percent: f64,
    pub volume_percent: f64,
}

/// Concentration of volume across the client base
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoData {
    /// Share of clients (percent) needed to reach the target volume share
    pub top_clients_percent: f64,
    pub top_clients_count: usize,
    /// Volume share (percent) those clients actually reach
    pub top_volume_percent: f64,
    /// Volume of the smallest client inside the top group
    pub cutoff_value: f64,
    pub bottom_clients: BottomClients,
    pub gini_index: f64,
}

/// Pareto analysis over clients ranked by descending volume
///
/// Finds the shortest prefix whose cumulative volume reaches `target`
/// (a fraction, 0.8 for the classic 80/20 split).
pub fn compute(ranked: &[&ClientVolume], total_volume: f64, target: f64) -> ParetoData {
    if ranked.is_empty() || total_volume <= 0.0 {
        return ParetoData::default();
    }

    let n = ranked.len();
    let threshold = total_volume * target;

    let mut cumulative = 0.0;
    let mut top_count = n;
    for (i, client) in ranked.iter().enumerate() {
        cumulative += client.volume;
        if cumulative + total_volume * CUMULATIVE_TOLERANCE >= threshold {
            top_count = i + 1;
            break;
        }
    }

    let top_clients_percent = top_count as f64 * 100.0 / n as f64;
    let top_volume_percent = (cumulative * 100.0 / total_volume).min(100.0);

    let volumes: Vec<f64> = ranked.iter().map(|c| c.volume).collect();

    ParetoData {
        top_clients_percent,
        top_clients_count: top_count,
        top_volume_percent,
        cutoff_value: ranked[top_count - 1].volume,
        bottom_clients: BottomClients {
            count: n - top_count,
            percent: 100.0 - top_clients_percent,
            volume_percent: (100.0 - top_volume_percent).max(0.0),
        },
        gini_index: gini_coefficient(&volumes),
    }
}
