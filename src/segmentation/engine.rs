use crate::data::ClientVolume;
use crate::segmentation::pareto::{self, ParetoData};
use crate::segmentation::recommendation::{Recommendation, Strategy};
use crate::segmentation::statistics::{self, SegmentationStatistics};
use crate::segmentation::{GroupType, MetricUnit, SegmentationConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Volume bounds of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRange {
    pub min: f64,
    pub max: f64,
    pub unit: MetricUnit,
}

/// One quantile bucket of the client population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSegment {
    pub id: String,
    pub label: String,
    /// 1 = highest-volume bucket
    pub rank: usize,
    pub range: SegmentRange,

    pub client_count: usize,
    pub client_percent: f64,
    pub client_percent_accum: f64,

    pub volume: f64,
    pub volume_percent: f64,
    pub volume_percent_accum: f64,

    pub avg_ticket: f64,
    /// Members in descending volume order
    pub client_ids: Vec<String>,
    pub recommendation: Recommendation,
}

/// Full result of one segmentation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationReport {
    pub group_type: GroupType,
    pub unit: MetricUnit,
    pub segments: Vec<ClientSegment>,
    pub statistics: SegmentationStatistics,
    pub pareto: ParetoData,
    pub total_clients: usize,
    pub total_volume: f64,
}

impl SegmentationReport {
    pub fn segment(&self, id: &str) -> Option<&ClientSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segment holding `client_id`
    pub fn segment_of(&self, client_id: &str) -> Option<&ClientSegment> {
        self.segments
            .iter()
            .find(|s| s.client_ids.iter().any(|id| id == client_id))
    }
}

/// Segment clients with default settings for `group_type`
pub fn segment(clients: &[ClientVolume], group_type: GroupType) -> SegmentationReport {
    segment_with(clients, &SegmentationConfig::new(group_type))
}

/// Segment clients into equal-count buckets by descending volume
///
/// Algorithm:
/// 1. Rank clients by descending volume (stable, ties keep input order)
/// 2. Split the ranking at `floor(i * count / N)`; the last bucket ends at
///    `count`, so every client lands in exactly one bucket
/// 3. Summarise each non-empty bucket (shares, running shares, range, ticket)
/// 4. Compute distribution statistics and Pareto concentration
pub fn segment_with(clients: &[ClientVolume], config: &SegmentationConfig) -> SegmentationReport {
    let mut ranked: Vec<&ClientVolume> = clients.iter().collect();
    ranked.sort_by(|a, b| b.volume.total_cmp(&a.volume));

    let total_clients = ranked.len();
    let total_volume: f64 = ranked.iter().map(|c| c.volume).sum();

    let segments = build_segments(&ranked, total_volume, config);
    let statistics = statistics::compute(&ranked, config.unit);
    let pareto = pareto::compute(&ranked, total_volume, config.pareto_target);

    debug!(
        clients = total_clients,
        segments = segments.len(),
        group_type = ?config.group_type,
        "Segmentation complete"
    );

    SegmentationReport {
        group_type: config.group_type,
        unit: config.unit,
        segments,
        statistics,
        pareto,
        total_clients,
        total_volume,
    }
}

/// Half-open index ranges of each bucket over `count` ranked clients
pub fn partition_bounds(count: usize, buckets: usize) -> Vec<(usize, usize)> {
    (0..buckets)
        .map(|i| {
            let start = i * count / buckets;
            let end = if i + 1 == buckets {
                count
            } else {
                (i + 1) * count / buckets
            };
            (start, end)
        })
        .collect()
}

fn build_segments(
    ranked: &[&ClientVolume],
    total_volume: f64,
    config: &SegmentationConfig,
) -> Vec<ClientSegment> {
    let total_clients = ranked.len();
    let group_type = config.group_type;

    let mut segments = Vec::new();
    let mut clients_accum = 0usize;
    let mut volume_accum = 0.0;

    for (i, (start, end)) in partition_bounds(total_clients, group_type.bucket_count())
        .into_iter()
        .enumerate()
    {
        let members = &ranked[start..end];
        if members.is_empty() {
            continue;
        }

        let rank = i + 1;
        let client_count = members.len();
        let volume: f64 = members.iter().map(|c| c.volume).sum();
        let clients_above = percent(clients_accum as f64, total_clients as f64);

        clients_accum += client_count;
        volume_accum += volume;

        segments.push(ClientSegment {
            id: group_type.segment_id(rank),
            label: format!("{} {}", group_type.singular(), rank),
            rank,
            range: SegmentRange {
                min: members[client_count - 1].volume,
                max: members[0].volume,
                unit: config.unit,
            },
            client_count,
            client_percent: percent(client_count as f64, total_clients as f64),
            client_percent_accum: percent(clients_accum as f64, total_clients as f64),
            volume,
            volume_percent: percent(volume, total_volume),
            volume_percent_accum: percent(volume_accum, total_volume),
            avg_ticket: volume / client_count as f64,
            client_ids: members.iter().map(|c| c.id.clone()).collect(),
            recommendation: Strategy::for_rank_share(clients_above).into(),
        });
    }

    segments
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part * 100.0 / whole
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients(volumes: &[f64]) -> Vec<ClientVolume> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, v)| ClientVolume::new(format!("C{}", i), *v))
            .collect()
    }

    #[test]
    fn test_partition_bounds_cover_everything() {
        assert_eq!(
            partition_bounds(10, 4),
            vec![(0, 2), (2, 5), (5, 7), (7, 10)]
        );
        assert_eq!(partition_bounds(3, 5), vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 3)]);
        assert_eq!(partition_bounds(0, 4), vec![(0, 0); 4]);
    }

    #[test]
    fn test_quartiles_of_ten_clients() {
        let data = clients(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let report = segment(&data, GroupType::Quartiles);

        assert_eq!(report.total_clients, 10);
        assert_eq!(report.total_volume, 55.0);
        assert_eq!(report.segments.len(), 4);

        let counts: Vec<usize> = report.segments.iter().map(|s| s.client_count).collect();
        assert_eq!(counts, vec![2, 3, 2, 3]);

        let top = &report.segments[0];
        assert_eq!(top.id, "Q1");
        assert_eq!(top.label, "Quartile 1");
        assert_eq!(top.client_ids, vec!["C9", "C8"]);
        assert_eq!(top.volume, 19.0);
        assert_eq!(top.range.max, 10.0);
        assert_eq!(top.range.min, 9.0);
        assert_eq!(top.avg_ticket, 9.5);
        assert_eq!(top.client_percent, 20.0);
        assert_eq!(top.recommendation.strategy, Strategy::Retain);

        let last = report.segments.last().unwrap();
        assert_eq!(last.range.min, 1.0);
        assert!((last.volume_percent_accum - 100.0).abs() < 1e-9);
        assert!((last.client_percent_accum - 100.0).abs() < 1e-9);
        // 7 of 10 clients rank above the last quartile
        assert_eq!(last.recommendation.strategy, Strategy::Monitor);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let data = clients(&[13.0, 7.5, 120.0, 0.5, 44.0, 9.0, 3.3]);
        let report = segment(&data, GroupType::Deciles);

        let count: usize = report.segments.iter().map(|s| s.client_count).sum();
        let volume_pct: f64 = report.segments.iter().map(|s| s.volume_percent).sum();
        let client_pct: f64 = report.segments.iter().map(|s| s.client_percent).sum();

        assert_eq!(count, 7);
        assert!((volume_pct - 100.0).abs() < 1e-9);
        assert!((client_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_clients_than_buckets_skips_empty() {
        let data = clients(&[5.0, 3.0, 1.0]);
        let report = segment(&data, GroupType::Quintiles);

        let ids: Vec<&str> = report.segments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Q2", "Q4", "Q5"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let data = clients(&[5.0, 5.0, 5.0, 5.0]);
        let report = segment(&data, GroupType::Quartiles);
        let order: Vec<&str> = report
            .segments
            .iter()
            .flat_map(|s| s.client_ids.iter().map(String::as_str))
            .collect();
        assert_eq!(order, vec!["C0", "C1", "C2", "C3"]);
    }

    #[test]
    fn test_empty_population() {
        let report = segment(&[], GroupType::Percentiles);
        assert!(report.segments.is_empty());
        assert_eq!(report.total_volume, 0.0);
        assert_eq!(report.statistics.count, 0);
        assert_eq!(report.pareto, ParetoData::default());
    }

    #[test]
    fn test_zero_volume_population() {
        let report = segment(&clients(&[0.0, 0.0, 0.0, 0.0]), GroupType::Quartiles);
        assert_eq!(report.segments.len(), 4);
        assert!(report.segments.iter().all(|s| s.volume_percent == 0.0));
        assert_eq!(report.pareto.gini_index, 0.0);
    }

    #[test]
    fn test_segment_lookup() {
        let report = segment(&clients(&[1.0, 2.0, 3.0, 4.0]), GroupType::Quartiles);
        assert_eq!(report.segment_of("C3").map(|s| s.id.as_str()), Some("Q1"));
        assert_eq!(report.segment("Q4").map(|s| s.client_count), Some(1));
        assert!(report.segment_of("missing").is_none());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let data = clients(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        assert_eq!(
            segment(&data, GroupType::Quintiles),
            segment(&data, GroupType::Quintiles)
        );
    }
}
