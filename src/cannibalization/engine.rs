use crate::cannibalization::trend::{classify_sku, SkuTrend};
use crate::cannibalization::DetectionRules;
use crate::data::{ClientNode, FamilyGroup};
use crate::stats::{round_decimal, round_to};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One detected substitution inside a client's product family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCannibalization {
    /// `{client_id}-{family}`
    pub id: String,
    pub client_name: String,
    pub matriz: String,
    pub gerencia: String,
    pub jefatura: String,
    pub route: String,
    pub family: String,

    pub victim_sku: String,
    pub cannibal_sku: String,

    /// Volume the victim lost over the post period (2 decimals)
    pub volume_lost: f64,
    /// Volume the cannibal gained over the post period (2 decimals)
    pub volume_gained: f64,
    /// `volume_gained - volume_lost` (2 decimals)
    pub net_balance: f64,
    /// Share of the lost volume recovered by the cannibal, in percent (1 decimal)
    pub substitution_rate: f64,

    /// Ranking key: loss + gain, unrounded
    pub impact_score: f64,
}

/// Run cannibalization detection over every client and family
///
/// Returns cases sorted by descending impact score. A split month that
/// leaves no pre or post period yields an empty list.
pub fn run_analysis(data: &[ClientNode], rules: &DetectionRules) -> Vec<DetectedCannibalization> {
    let Some(split_index) = rules.split_index() else {
        warn!(
            split_month = rules.split_month,
            "Split month leaves no pre/post period to compare, skipping analysis"
        );
        return Vec::new();
    };

    let mut results: Vec<DetectedCannibalization> = data
        .iter()
        .flat_map(|client| {
            client
                .families
                .iter()
                .filter_map(move |family| detect_in_family(client, family, rules, split_index))
        })
        .collect();

    // Stable: ties keep client/family input order
    results.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));

    debug!(
        clients = data.len(),
        cases = results.len(),
        split_month = rules.split_month,
        "Cannibalization analysis complete"
    );

    results
}

/// Classify the family's SKUs and pair the top victim with the top cannibal
///
/// Victim and cannibal are picked independently (largest loss, largest
/// gain), so a family reports at most one case even when several pairs
/// would qualify.
fn detect_in_family(
    client: &ClientNode,
    family: &FamilyGroup,
    rules: &DetectionRules,
    split_index: usize,
) -> Option<DetectedCannibalization> {
    let trends: Vec<SkuTrend> = family
        .skus
        .iter()
        .map(|sku| classify_sku(sku, rules, split_index))
        .collect();

    let (victim, loss) = first_max(trends.iter().filter_map(|t| t.loss.map(|l| (t, l))))?;
    let (cannibal, gain) = first_max(trends.iter().filter_map(|t| t.gain.map(|g| (t, g))))?;

    Some(build_case(client, family, victim, loss, cannibal, gain))
}

/// Highest-scoring item; the earliest one wins a tie
fn first_max<'a>(
    candidates: impl Iterator<Item = (&'a SkuTrend, f64)>,
) -> Option<(&'a SkuTrend, f64)> {
    candidates.fold(None, |best, (trend, score)| match best {
        Some((_, best_score)) if score <= best_score => best,
        _ => Some((trend, score)),
    })
}

fn build_case(
    client: &ClientNode,
    family: &FamilyGroup,
    victim: &SkuTrend,
    loss: f64,
    cannibal: &SkuTrend,
    gain: f64,
) -> DetectedCannibalization {
    let substitution_rate = if loss > 0.0 { gain / loss * 100.0 } else { 0.0 };

    // Net is taken from the rounded figures so it always reconciles with them
    let (volume_lost, volume_gained, net_balance) =
        match (round_decimal(loss, 2), round_decimal(gain, 2)) {
            (Some(lost), Some(gained)) => (
                lost.to_f64().unwrap_or(loss),
                gained.to_f64().unwrap_or(gain),
                (gained - lost).to_f64().unwrap_or(gain - loss),
            ),
            _ => (loss, gain, gain - loss),
        };

    DetectedCannibalization {
        id: format!("{}-{}", client.id, family.name),
        client_name: client.name.clone(),
        matriz: client.matriz.clone(),
        gerencia: client.gerencia.clone(),
        jefatura: client.jefatura.clone(),
        route: client.route.clone(),
        family: family.name.clone(),
        victim_sku: victim.sku.clone(),
        cannibal_sku: cannibal.sku.clone(),
        volume_lost,
        volume_gained,
        net_balance,
        substitution_rate: round_to(substitution_rate, 1),
        impact_score: loss + gain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SkuMonthlyData, MONTHS};

    fn step(name: &str, pre: f64, post: f64, split_index: usize) -> SkuMonthlyData {
        let mut v = [post; MONTHS];
        v[..split_index].iter_mut().for_each(|x| *x = pre);
        SkuMonthlyData::new(name, v)
    }

    fn client(id: &str, families: Vec<FamilyGroup>) -> ClientNode {
        let mut node = ClientNode::new(id, format!("Client {}", id));
        node.matriz = "M-01".to_string();
        node.gerencia = "Norte".to_string();
        node.jefatura = "J-3".to_string();
        node.route = "R-77".to_string();
        node.families = families;
        node
    }

    fn rules(split_month: u32) -> DetectionRules {
        DetectionRules {
            drop_threshold: 0.5,
            growth_threshold: 0.2,
            min_volume: 10.0,
            split_month,
        }
    }

    #[test]
    fn test_single_substitution_case() {
        let family = FamilyGroup::new(
            "Galletas",
            vec![step("GAL-OLD", 100.0, 40.0, 6), step("GAL-NEW", 0.0, 70.0, 6)],
        );
        let data = vec![client("C1", vec![family])];

        let cases = run_analysis(&data, &rules(7));
        assert_eq!(cases.len(), 1);

        let case = &cases[0];
        assert_eq!(case.id, "C1-Galletas");
        assert_eq!(case.client_name, "Client C1");
        assert_eq!(case.matriz, "M-01");
        assert_eq!(case.route, "R-77");
        assert_eq!(case.victim_sku, "GAL-OLD");
        assert_eq!(case.cannibal_sku, "GAL-NEW");
        assert_eq!(case.volume_lost, 360.0);
        assert_eq!(case.volume_gained, 420.0);
        assert_eq!(case.net_balance, 60.0);
        assert_eq!(case.substitution_rate, 116.7);
        assert_eq!(case.impact_score, 780.0);
    }

    #[test]
    fn test_zero_loss_victim_has_zero_substitution_rate() {
        // A zero drop threshold lets a flat SKU qualify as a victim with no loss
        let family = FamilyGroup::new(
            "Bebidas",
            vec![step("FLAT", 20.0, 20.0, 6), step("UP", 10.0, 50.0, 6)],
        );
        let data = vec![client("C1", vec![family])];
        let rules = DetectionRules {
            drop_threshold: 0.0,
            ..rules(7)
        };

        let cases = run_analysis(&data, &rules);
        assert_eq!(cases.len(), 1);

        let case = &cases[0];
        assert_eq!(case.victim_sku, "FLAT");
        assert_eq!(case.cannibal_sku, "UP");
        assert_eq!(case.volume_lost, 0.0);
        assert_eq!(case.volume_gained, 240.0);
        assert_eq!(case.net_balance, 240.0);
        assert_eq!(case.substitution_rate, 0.0);
        assert!(case.substitution_rate.is_finite());
        assert!(case.impact_score.is_finite());
    }

    #[test]
    fn test_same_sku_can_fill_both_roles() {
        // A negative drop threshold turns a growing SKU into its own victim;
        // DetectionRules::validate rejects such rules when loaded from config
        let family = FamilyGroup::new("Lacteos", vec![step("YOG", 50.0, 80.0, 4)]);
        let data = vec![client("C1", vec![family])];
        let rules = DetectionRules {
            drop_threshold: -1.0,
            growth_threshold: 0.1,
            ..rules(5)
        };
        assert!(rules.validate().is_err());

        let cases = run_analysis(&data, &rules);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].victim_sku, "YOG");
        assert_eq!(cases[0].cannibal_sku, "YOG");
        assert_eq!(cases[0].volume_lost, -240.0);
        assert_eq!(cases[0].volume_gained, 240.0);
        assert_eq!(cases[0].substitution_rate, 0.0);
    }

    #[test]
    fn test_invalid_split_month_returns_empty() {
        let family = FamilyGroup::new(
            "F",
            vec![step("A", 100.0, 0.0, 6), step("B", 0.0, 100.0, 6)],
        );
        let data = vec![client("C1", vec![family])];

        for split_month in [0, 1, 12, 13, 40] {
            assert!(run_analysis(&data, &rules(split_month)).is_empty());
        }
        assert_eq!(run_analysis(&data, &rules(7)).len(), 1);
    }

    #[test]
    fn test_family_without_cannibal_produces_nothing() {
        let family = FamilyGroup::new(
            "F",
            vec![step("A", 100.0, 10.0, 6), step("B", 50.0, 50.0, 6)],
        );
        assert!(run_analysis(&[client("C1", vec![family])], &rules(7)).is_empty());
    }

    #[test]
    fn test_cross_family_substitution_ignored() {
        let victims = FamilyGroup::new("Victims", vec![step("A", 100.0, 10.0, 6)]);
        let cannibals = FamilyGroup::new("Cannibals", vec![step("B", 0.0, 100.0, 6)]);
        assert!(run_analysis(&[client("C1", vec![victims, cannibals])], &rules(7)).is_empty());
    }

    #[test]
    fn test_picks_largest_victim_and_cannibal() {
        let family = FamilyGroup::new(
            "F",
            vec![
                step("SMALL-DROP", 30.0, 10.0, 6),
                step("BIG-DROP", 200.0, 20.0, 6),
                step("SMALL-RISE", 10.0, 20.0, 6),
                step("BIG-RISE", 10.0, 150.0, 6),
            ],
        );
        let cases = run_analysis(&[client("C1", vec![family])], &rules(7));

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].victim_sku, "BIG-DROP");
        assert_eq!(cases[0].cannibal_sku, "BIG-RISE");
        assert_eq!(cases[0].volume_lost, 1080.0);
        assert_eq!(cases[0].volume_gained, 840.0);
        assert_eq!(cases[0].net_balance, -240.0);
        assert_eq!(cases[0].substitution_rate, 77.8);
    }

    #[test]
    fn test_tie_keeps_first_sku() {
        let family = FamilyGroup::new(
            "F",
            vec![
                step("V1", 100.0, 0.0, 6),
                step("V2", 100.0, 0.0, 6),
                step("C1", 0.0, 50.0, 6),
                step("C2", 0.0, 50.0, 6),
            ],
        );
        let cases = run_analysis(&[client("X", vec![family])], &rules(7));
        assert_eq!(cases[0].victim_sku, "V1");
        assert_eq!(cases[0].cannibal_sku, "C1");
    }

    #[test]
    fn test_cases_sorted_by_impact() {
        let small = FamilyGroup::new(
            "Small",
            vec![step("A", 20.0, 5.0, 6), step("B", 0.0, 15.0, 6)],
        );
        let large = FamilyGroup::new(
            "Large",
            vec![step("C", 500.0, 100.0, 6), step("D", 0.0, 380.0, 6)],
        );
        let medium = FamilyGroup::new(
            "Medium",
            vec![step("E", 100.0, 20.0, 6), step("F", 0.0, 60.0, 6)],
        );
        let data = vec![
            client("C1", vec![small]),
            client("C2", vec![large, medium]),
        ];

        let cases = run_analysis(&data, &rules(7));
        let families: Vec<&str> = cases.iter().map(|c| c.family.as_str()).collect();
        assert_eq!(families, vec!["Large", "Medium", "Small"]);
    }

    #[test]
    fn test_noise_filtered_by_min_volume() {
        let family = FamilyGroup::new(
            "F",
            vec![step("A", 4.0, 1.0, 6), step("B", 0.0, 4.0, 6)],
        );
        assert!(run_analysis(&[client("C1", vec![family])], &rules(7)).is_empty());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let family = FamilyGroup::new(
            "F",
            vec![step("A", 97.3, 12.9, 4), step("B", 3.1, 77.7, 4)],
        );
        let data = vec![client("C1", vec![family])];
        assert_eq!(run_analysis(&data, &rules(5)), run_analysis(&data, &rules(5)));
    }
}
