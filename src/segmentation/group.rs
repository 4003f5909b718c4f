use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// How many equal-count buckets the client population is split into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Quartiles,
    #[default]
    Quintiles,
    Deciles,
    Percentiles,
}

impl GroupType {
    pub fn bucket_count(self) -> usize {
        match self {
            GroupType::Quartiles => 4,
            GroupType::Quintiles => 5,
            GroupType::Deciles => 10,
            GroupType::Percentiles => 100,
        }
    }

    /// Prefix of segment ids (`Q1`, `D3`, `P95`)
    pub fn id_prefix(self) -> &'static str {
        match self {
            GroupType::Quartiles | GroupType::Quintiles => "Q",
            GroupType::Deciles => "D",
            GroupType::Percentiles => "P",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            GroupType::Quartiles => "Quartile",
            GroupType::Quintiles => "Quintile",
            GroupType::Deciles => "Decile",
            GroupType::Percentiles => "Percentile",
        }
    }

    pub fn segment_id(self, rank: usize) -> String {
        format!("{}{}", self.id_prefix(), rank)
    }
}

impl std::str::FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quartiles" => Ok(GroupType::Quartiles),
            "quintiles" => Ok(GroupType::Quintiles),
            "deciles" => Ok(GroupType::Deciles),
            "percentiles" => Ok(GroupType::Percentiles),
            other => Err(format!("unknown group type: {}", other)),
        }
    }
}

/// Unit the volumes are expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    #[default]
    #[serde(rename = "KG")]
    Kg,
    #[serde(rename = "$$")]
    Currency,
}

/// Segmentation settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentationConfig {
    #[serde(alias = "group_type")]
    pub group_type: GroupType,
    pub unit: MetricUnit,
    /// Share of total volume the Pareto prefix must reach (0.8 = 80%)
    #[serde(alias = "pareto_target")]
    pub pareto_target: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            group_type: GroupType::default(),
            unit: MetricUnit::default(),
            pareto_target: 0.8,
        }
    }
}

impl SegmentationConfig {
    pub fn new(group_type: GroupType) -> Self {
        Self {
            group_type,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if !(self.pareto_target > 0.0 && self.pareto_target <= 1.0) {
            return Err(ValidationError::InvalidParetoTarget(self.pareto_target));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_counts() {
        assert_eq!(GroupType::Quartiles.bucket_count(), 4);
        assert_eq!(GroupType::Quintiles.bucket_count(), 5);
        assert_eq!(GroupType::Deciles.bucket_count(), 10);
        assert_eq!(GroupType::Percentiles.bucket_count(), 100);
    }

    #[test]
    fn test_segment_ids() {
        assert_eq!(GroupType::Quintiles.segment_id(1), "Q1");
        assert_eq!(GroupType::Deciles.segment_id(3), "D3");
        assert_eq!(GroupType::Percentiles.segment_id(95), "P95");
    }

    #[test]
    fn test_group_type_parsing() {
        assert_eq!("Deciles".parse::<GroupType>(), Ok(GroupType::Deciles));
        assert!("sextiles".parse::<GroupType>().is_err());

        let parsed: GroupType = serde_json::from_str("\"percentiles\"").unwrap();
        assert_eq!(parsed, GroupType::Percentiles);
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&MetricUnit::Kg).unwrap(), "\"KG\"");
        assert_eq!(serde_json::to_string(&MetricUnit::Currency).unwrap(), "\"$$\"");
    }

    #[test]
    fn test_pareto_target_validation() {
        assert!(SegmentationConfig::default().validate().is_ok());

        let mut config = SegmentationConfig::default();
        config.pareto_target = 0.0;
        assert!(config.validate().is_err());
        config.pareto_target = 1.5;
        assert!(config.validate().is_err());
    }
}
