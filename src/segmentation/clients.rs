use crate::data::ClientVolume;
use crate::segmentation::ClientSegment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A segment member with its position in the overall ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedClient {
    pub client_id: String,
    pub client_name: String,
    pub volume: f64,
    /// 1-based rank across the whole population
    pub volume_rank: usize,
    /// Share of the segment's volume, in percent
    pub segment_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_clients: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMeta {
    pub total_volume: f64,
    pub avg_volume: f64,
}

/// One page of a segment's members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentClientsPage {
    pub segment_id: String,
    pub clients: Vec<RankedClient>,
    pub pagination: Pagination,
    pub meta: SegmentMeta,
}

/// List the members of `segment`, ranked, one page at a time
///
/// `clients` must be the population the segment was computed from. Pages
/// are 1-based; a page size of 0 is treated as 1 and pages past the end
/// come back empty.
pub fn segment_clients(
    clients: &[ClientVolume],
    segment: &ClientSegment,
    page: usize,
    page_size: usize,
) -> SegmentClientsPage {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let mut ranked: Vec<&ClientVolume> = clients.iter().collect();
    ranked.sort_by(|a, b| b.volume.total_cmp(&a.volume));

    let mut ranks: HashMap<&str, (usize, &ClientVolume)> = HashMap::with_capacity(ranked.len());
    for (i, client) in ranked.iter().enumerate() {
        ranks.entry(client.id.as_str()).or_insert((i + 1, *client));
    }

    let total_clients = segment.client_ids.len();
    let total_pages = total_clients.div_ceil(page_size);

    let members = segment
        .client_ids
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .filter_map(|id| ranks.get(id.as_str()))
        .map(|(rank, client)| RankedClient {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            volume: client.volume,
            volume_rank: *rank,
            segment_share: if segment.volume > 0.0 {
                client.volume * 100.0 / segment.volume
            } else {
                0.0
            },
        })
        .collect();

    SegmentClientsPage {
        segment_id: segment.id.clone(),
        clients: members,
        pagination: Pagination {
            page,
            page_size,
            total_clients,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
        meta: SegmentMeta {
            total_volume: segment.volume,
            avg_volume: segment.avg_ticket,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::{segment, GroupType};

    fn population() -> Vec<ClientVolume> {
        (1..=20)
            .map(|i| ClientVolume::named(format!("C{:02}", i), format!("Tienda {}", i), i as f64 * 10.0))
            .collect()
    }

    #[test]
    fn test_first_page_of_top_segment() {
        let clients = population();
        let report = segment(&clients, GroupType::Quartiles);
        let top = &report.segments[0];

        let page = segment_clients(&clients, top, 1, 2);

        assert_eq!(page.segment_id, "Q1");
        assert_eq!(page.clients.len(), 2);
        assert_eq!(page.clients[0].client_id, "C20");
        assert_eq!(page.clients[0].volume_rank, 1);
        assert_eq!(page.clients[1].volume_rank, 2);
        assert_eq!(page.clients[0].client_name, "Tienda 20");
        assert_eq!(page.pagination.total_clients, 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next_page);
        assert!(!page.pagination.has_prev_page);
        assert_eq!(page.meta.total_volume, top.volume);
    }

    #[test]
    fn test_last_page_and_ranks_continue() {
        let clients = population();
        let report = segment(&clients, GroupType::Quartiles);
        let second = &report.segments[1];

        let page = segment_clients(&clients, second, 3, 2);
        assert_eq!(page.clients.len(), 1);
        assert_eq!(page.clients[0].volume_rank, 10);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let clients = population();
        let report = segment(&clients, GroupType::Quartiles);

        let page = segment_clients(&clients, &report.segments[0], 9, 50);
        assert!(page.clients.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let clients = population();
        let report = segment(&clients, GroupType::Quartiles);

        let page = segment_clients(&clients, &report.segments[0], 0, 0);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.page_size, 1);
        assert_eq!(page.clients.len(), 1);
    }
}
