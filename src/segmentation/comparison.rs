use crate::data::ClientVolume;
use crate::segmentation::{segment_with, ClientSegment, SegmentationConfig, SegmentationReport};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Settings for comparing two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonConfig {
    pub segmentation: SegmentationConfig,
    pub label1: String,
    pub label2: String,
    /// How many growers and decliners to report
    pub top_n: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            label1: "Period 1".to_string(),
            label2: "Period 2".to_string(),
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub label: String,
    pub total_clients: usize,
    pub total_volume: f64,
    pub avg_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChanges {
    pub clients_change: i64,
    pub clients_change_percent: f64,
    pub volume_change: f64,
    pub volume_change_percent: f64,
}

/// Movement of returning clients between segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMigration {
    pub same_segment: usize,
    pub moved_up: usize,
    pub moved_down: usize,
    /// `"{from}->{to}"` segment id pairs to client counts
    pub migration_matrix: BTreeMap<String, usize>,
    /// Share of period 1 clients still buying in period 2, in percent
    pub retention_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVolumeChange {
    pub client_id: String,
    pub client_name: String,
    pub volume_period1: f64,
    pub volume_period2: f64,
    pub change: f64,
    /// 0 when the client had no volume in period 1
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationComparison {
    pub period1: PeriodSummary,
    pub period2: PeriodSummary,
    pub changes: PeriodChanges,
    pub migration: SegmentMigration,
    pub top_growers: Vec<ClientVolumeChange>,
    pub top_decliners: Vec<ClientVolumeChange>,
    pub new_clients: usize,
    pub lost_clients: usize,
}

/// Compare the client base of two periods
///
/// Each period is segmented on its own; clients present in both are
/// tracked across segments. A client id repeated within a period counts
/// once, with its first row, in the totals as well as in the tracking.
pub fn compare_periods(
    period1: &[ClientVolume],
    period2: &[ClientVolume],
    config: &ComparisonConfig,
) -> SegmentationComparison {
    let period1 = first_rows(period1);
    let period2 = first_rows(period2);

    let report1 = segment_with(&period1, &config.segmentation);
    let report2 = segment_with(&period2, &config.segmentation);

    let first = index_by_id(&period1);
    let second = index_by_id(&period2);

    let summary1 = summarize(&config.label1, &report1);
    let summary2 = summarize(&config.label2, &report2);

    let returning: Vec<(&ClientVolume, &ClientVolume)> = period1
        .iter()
        .filter_map(|c| second.get(c.id.as_str()).map(|later| (c, *later)))
        .collect();

    let migration = migrate(&returning, &report1, &report2, first.len());

    let mut changes: Vec<ClientVolumeChange> = returning
        .iter()
        .map(|(before, after)| ClientVolumeChange {
            client_id: before.id.clone(),
            client_name: if before.name.is_empty() {
                after.name.clone()
            } else {
                before.name.clone()
            },
            volume_period1: before.volume,
            volume_period2: after.volume,
            change: after.volume - before.volume,
            change_percent: percent_change(before.volume, after.volume),
        })
        .collect();

    changes.sort_by(|a, b| b.change.total_cmp(&a.change));
    let top_growers: Vec<ClientVolumeChange> = changes
        .iter()
        .filter(|c| c.change > 0.0)
        .take(config.top_n)
        .cloned()
        .collect();
    let top_decliners: Vec<ClientVolumeChange> = changes
        .iter()
        .rev()
        .filter(|c| c.change < 0.0)
        .take(config.top_n)
        .cloned()
        .collect();

    let new_clients = second.keys().filter(|id| !first.contains_key(*id)).count();
    let lost_clients = first.keys().filter(|id| !second.contains_key(*id)).count();

    SegmentationComparison {
        changes: PeriodChanges {
            clients_change: count_change(first.len(), second.len()),
            clients_change_percent: percent_change(first.len() as f64, second.len() as f64),
            volume_change: summary2.total_volume - summary1.total_volume,
            volume_change_percent: percent_change(summary1.total_volume, summary2.total_volume),
        },
        period1: summary1,
        period2: summary2,
        migration,
        top_growers,
        top_decliners,
        new_clients,
        lost_clients,
    }
}

/// Input rows with repeated ids dropped, keeping the first occurrence
fn first_rows(clients: &[ClientVolume]) -> Vec<ClientVolume> {
    let mut seen = HashSet::with_capacity(clients.len());
    clients
        .iter()
        .filter(|c| seen.insert(c.id.as_str()))
        .cloned()
        .collect()
}

fn index_by_id(clients: &[ClientVolume]) -> HashMap<&str, &ClientVolume> {
    clients.iter().map(|c| (c.id.as_str(), c)).collect()
}

/// Client id to the segment holding it
fn segment_by_client(report: &SegmentationReport) -> HashMap<&str, &ClientSegment> {
    report
        .segments
        .iter()
        .flat_map(|s| s.client_ids.iter().map(move |id| (id.as_str(), s)))
        .collect()
}

fn summarize(label: &str, report: &SegmentationReport) -> PeriodSummary {
    PeriodSummary {
        label: label.to_string(),
        total_clients: report.total_clients,
        total_volume: report.total_volume,
        avg_volume: if report.total_clients > 0 {
            report.total_volume / report.total_clients as f64
        } else {
            0.0
        },
    }
}

fn migrate(
    returning: &[(&ClientVolume, &ClientVolume)],
    report1: &SegmentationReport,
    report2: &SegmentationReport,
    period1_clients: usize,
) -> SegmentMigration {
    let mut migration = SegmentMigration {
        same_segment: 0,
        moved_up: 0,
        moved_down: 0,
        migration_matrix: BTreeMap::new(),
        retention_rate: if period1_clients > 0 {
            returning.len() as f64 * 100.0 / period1_clients as f64
        } else {
            0.0
        },
    };

    let segments1 = segment_by_client(report1);
    let segments2 = segment_by_client(report2);

    for (before, _) in returning {
        let (Some(from), Some(to)) = (
            segments1.get(before.id.as_str()),
            segments2.get(before.id.as_str()),
        ) else {
            continue;
        };

        // Lower rank is the higher-volume segment
        match to.rank.cmp(&from.rank) {
            std::cmp::Ordering::Equal => migration.same_segment += 1,
            std::cmp::Ordering::Less => migration.moved_up += 1,
            std::cmp::Ordering::Greater => migration.moved_down += 1,
        }

        *migration
            .migration_matrix
            .entry(format!("{}->{}", from.id, to.id))
            .or_insert(0) += 1;
    }

    migration
}

fn count_change(before: usize, after: usize) -> i64 {
    after as i64 - before as i64
}

fn percent_change(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (after - before) * 100.0 / before
    } else {
        0.0
    }
}
