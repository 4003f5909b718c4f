pub mod engine;
pub mod rules;
pub mod summary;
pub mod trend;

pub use engine::{run_analysis, DetectedCannibalization};
pub use rules::{DetectionRules, RulesUpdate};
pub use summary::{available_families, summarize, CannibalizationSummary};
pub use trend::{classify_sku, SkuTrend, NEW_PRODUCT_GROWTH};
