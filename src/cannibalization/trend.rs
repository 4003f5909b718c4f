use crate::cannibalization::DetectionRules;
use crate::data::{SkuMonthlyData, MONTHS};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Growth rate assigned to a SKU with no pre-split sales (a new product)
pub const NEW_PRODUCT_GROWTH: f64 = 999.0;

/// Pre/post trajectory of one SKU and its role in a substitution
///
/// Victim and cannibal are independent classifications computed from the
/// same averages, so a SKU can carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuTrend {
    pub sku: String,
    pub avg_pre: f64,
    pub avg_post: f64,

    /// True when pre + post average is under the rules' minimum volume
    pub below_min_volume: bool,

    pub drop_rate: Option<f64>,
    pub growth_rate: Option<f64>,

    /// Estimated volume lost over the post period, set when the SKU is a victim
    pub loss: Option<f64>,

    /// Estimated volume gained over the post period, set when the SKU is a cannibal
    pub gain: Option<f64>,
}

impl SkuTrend {
    pub fn is_victim(&self) -> bool {
        self.loss.is_some()
    }

    pub fn is_cannibal(&self) -> bool {
        self.gain.is_some()
    }
}

/// Classify one SKU around `split_index`
///
/// Algorithm:
/// 1. Average sales before and after the split
/// 2. Drop SKUs whose combined average is under `min_volume`
/// 3. Victim if the drop rate reaches `drop_threshold` (needs pre sales)
/// 4. Cannibal if there is a net gain and the growth rate reaches
///    `growth_threshold`; SKUs new in the post period grow at [`NEW_PRODUCT_GROWTH`]
/// 5. Loss and gain extrapolate the monthly change over the post months
pub fn classify_sku(sku: &SkuMonthlyData, rules: &DetectionRules, split_index: usize) -> SkuTrend {
    let split = split_index.min(MONTHS);
    let avg_pre = stats::mean(&sku.sales_vector[..split]);
    let avg_post = stats::mean(&sku.sales_vector[split..]);
    let post_months = (MONTHS - split) as f64;

    let mut trend = SkuTrend {
        sku: sku.name.clone(),
        avg_pre,
        avg_post,
        below_min_volume: avg_pre + avg_post < rules.min_volume,
        drop_rate: None,
        growth_rate: None,
        loss: None,
        gain: None,
    };

    if trend.below_min_volume {
        return trend;
    }

    if avg_pre > 0.0 {
        let drop_rate = (avg_pre - avg_post) / avg_pre;
        trend.drop_rate = Some(drop_rate);

        if drop_rate >= rules.drop_threshold {
            trend.loss = Some((avg_pre - avg_post) * post_months);
        }
    }

    let gain_diff = avg_post - avg_pre;
    if gain_diff > 0.0 {
        let growth_rate = if avg_pre > 0.0 {
            gain_diff / avg_pre
        } else {
            NEW_PRODUCT_GROWTH
        };
        trend.growth_rate = Some(growth_rate);

        if growth_rate >= rules.growth_threshold {
            trend.gain = Some(gain_diff * post_months);
        }
    }

    trend
}
