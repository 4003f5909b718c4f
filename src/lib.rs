pub mod cannibalization;
pub mod data;
pub mod error;
pub mod segmentation;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use cannibalization::{
    available_families, classify_sku, run_analysis, summarize, CannibalizationSummary,
    DetectedCannibalization, DetectionRules, RulesUpdate, SkuTrend,
};
pub use data::{
    validate_clients, validate_volumes, ClientNode, ClientVolume, FamilyGroup, SkuMonthlyData,
    MONTHS,
};
pub use error::ValidationError;
pub use segmentation::{
    compare_periods, segment, segment_clients, segment_with, ClientSegment, ComparisonConfig,
    GroupType, MetricUnit, ParetoData, SegmentationComparison, SegmentationConfig,
    SegmentationReport, SegmentationStatistics,
};
pub use utils::Config;
