pub mod hierarchy;
pub mod volume;

pub use hierarchy::{validate_clients, ClientNode, FamilyGroup, SkuMonthlyData, MONTHS};
pub use volume::{validate_volumes, ClientVolume};
