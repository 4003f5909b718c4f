use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Lowest zero-based split index that still leaves a pre period
const MIN_SPLIT_INDEX: u32 = 1;
/// Highest zero-based split index that still leaves a post period
const MAX_SPLIT_INDEX: u32 = 10;

/// Detection rules for one analysis run
///
/// An immutable value: callers derive a new one with [`DetectionRules::with_update`]
/// and re-run the analysis explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionRules {
    /// Fractional decline that qualifies a SKU as victim (0.5 = 50%)
    #[serde(alias = "drop_threshold")]
    pub drop_threshold: f64,

    /// Fractional rise that qualifies a SKU as cannibal (0.2 = 20%)
    #[serde(alias = "growth_threshold")]
    pub growth_threshold: f64,

    /// Minimum pre + post average volume; anything below is noise
    #[serde(alias = "min_volume")]
    pub min_volume: f64,

    /// Calendar month (1-12) where the post period starts
    #[serde(alias = "split_month")]
    pub split_month: u32,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            drop_threshold: 0.5,
            growth_threshold: 0.2,
            min_volume: 10.0,
            split_month: 8,
        }
    }
}

impl DetectionRules {
    /// Zero-based index of the first post-split month
    ///
    /// None when the split leaves either period empty (split month outside 2-11).
    pub fn split_index(&self) -> Option<usize> {
        let index = self.split_month.checked_sub(1)?;
        (MIN_SPLIT_INDEX..=MAX_SPLIT_INDEX)
            .contains(&index)
            .then_some(index as usize)
    }

    /// Strict check for rules coming from configuration files
    pub fn validate(&self) -> ValidationResult<()> {
        let thresholds = [
            ("drop_threshold", self.drop_threshold),
            ("growth_threshold", self.growth_threshold),
            ("min_volume", self.min_volume),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidThreshold { name, value });
            }
        }

        if self.split_index().is_none() {
            return Err(ValidationError::SplitMonthOutOfRange(self.split_month));
        }

        Ok(())
    }

    /// New rules with the fields present in `update` replaced
    pub fn with_update(&self, update: &RulesUpdate) -> Self {
        Self {
            drop_threshold: update.drop_threshold.unwrap_or(self.drop_threshold),
            growth_threshold: update.growth_threshold.unwrap_or(self.growth_threshold),
            min_volume: update.min_volume.unwrap_or(self.min_volume),
            split_month: update.split_month.unwrap_or(self.split_month),
        }
    }
}

/// Partial rule change coming from a calibration control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesUpdate {
    pub drop_threshold: Option<f64>,
    pub growth_threshold: Option<f64>,
    pub min_volume: Option<f64>,
    pub split_month: Option<u32>,
}
