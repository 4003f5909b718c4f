pub mod clients;
pub mod comparison;
pub mod engine;
pub mod group;
pub mod pareto;
pub mod recommendation;
pub mod statistics;

pub use clients::{segment_clients, Pagination, RankedClient, SegmentClientsPage, SegmentMeta};
pub use comparison::{
    compare_periods, ClientVolumeChange, ComparisonConfig, PeriodChanges, PeriodSummary,
    SegmentMigration, SegmentationComparison,
};
pub use engine::{
    partition_bounds, segment, segment_with, ClientSegment, SegmentRange, SegmentationReport,
};
pub use group::{GroupType, MetricUnit, SegmentationConfig};
pub use pareto::{BottomClients, ParetoData};
pub use recommendation::{Recommendation, Strategy};
pub use statistics::{Outlier, SegmentationStatistics};
