use serde::{Deserialize, Serialize};

/// Commercial strategy suggested for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Retain,
    Grow,
    Monitor,
    Recover,
}

impl Strategy {
    /// Pick a strategy from the share of clients (percent) ranked above the segment
    ///
    /// Segments starting in the top 20% are retained, up to 50% grown, up to
    /// 80% monitored; the long tail is flagged for recovery.
    pub fn for_rank_share(clients_above_percent: f64) -> Self {
        if clients_above_percent < 20.0 {
            Strategy::Retain
        } else if clients_above_percent < 50.0 {
            Strategy::Grow
        } else if clients_above_percent < 80.0 {
            Strategy::Monitor
        } else {
            Strategy::Recover
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Strategy::Retain => "Key accounts: protect service level and relationship",
            Strategy::Grow => "Solid buyers: widen assortment and purchase frequency",
            Strategy::Monitor => "Mid tier: watch for declines and keep coverage efficient",
            Strategy::Recover => "Long tail: reactivate or review cost to serve",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub message: String,
}

impl From<Strategy> for Recommendation {
    fn from(strategy: Strategy) -> Self {
        Self {
            strategy,
            message: strategy.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_bands() {
        assert_eq!(Strategy::for_rank_share(0.0), Strategy::Retain);
        assert_eq!(Strategy::for_rank_share(19.9), Strategy::Retain);
        assert_eq!(Strategy::for_rank_share(20.0), Strategy::Grow);
        assert_eq!(Strategy::for_rank_share(60.0), Strategy::Monitor);
        assert_eq!(Strategy::for_rank_share(80.0), Strategy::Recover);
    }

    #[test]
    fn test_wire_format() {
        let rec = Recommendation::from(Strategy::Recover);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["strategy"], "recover");
    }
}
