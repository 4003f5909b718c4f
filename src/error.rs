use thiserror::Error;

/// Rejected input data or configuration.
///
/// Raised at ingestion time so the engines never run on vectors of the
/// wrong shape or on negative volumes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("SKU {sku}: {field} has {actual} entries, expected {expected}")]
    VectorLength {
        sku: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("client {client}, family {family}, SKU {sku}: month {month} has invalid {field} value {value}")]
    InvalidMonthlyValue {
        client: String,
        family: String,
        sku: String,
        field: &'static str,
        month: usize,
        value: f64,
    },

    #[error("client {client}: invalid volume {value}")]
    InvalidVolume { client: String, value: f64 },

    #[error("split month {0} leaves no pre or post period (expected 2-11)")]
    SplitMonthOutOfRange(u32),

    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("pareto target {0} must be within (0, 1]")]
    InvalidParetoTarget(f64),
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
