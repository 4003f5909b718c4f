use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Months covered by one sales vector (January at index 0)
pub const MONTHS: usize = 12;

/// Monthly sales and targets for one SKU
///
/// Both vectors are fixed-size arrays: a payload with any other number of
/// months fails to deserialize instead of being padded or truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuMonthlyData {
    pub name: String,
    pub sales_vector: [f64; MONTHS],
    #[serde(default)]
    pub meta_vector: [f64; MONTHS],
}

impl SkuMonthlyData {
    pub fn new(name: impl Into<String>, sales_vector: [f64; MONTHS]) -> Self {
        Self {
            name: name.into(),
            sales_vector,
            meta_vector: [0.0; MONTHS],
        }
    }

    /// Build from loosely-shaped vectors, rejecting anything that is not
    /// exactly one value per month.
    pub fn from_vectors(
        name: impl Into<String>,
        sales: Vec<f64>,
        meta: Vec<f64>,
    ) -> ValidationResult<Self> {
        let name = name.into();
        let sales_vector = to_months(&name, "salesVector", sales)?;
        let meta_vector = to_months(&name, "metaVector", meta)?;

        Ok(Self {
            name,
            sales_vector,
            meta_vector,
        })
    }

    pub fn with_meta(mut self, meta_vector: [f64; MONTHS]) -> Self {
        self.meta_vector = meta_vector;
        self
    }

    /// Total sales across the year
    pub fn total_sales(&self) -> f64 {
        self.sales_vector.iter().sum()
    }
}

fn to_months(sku: &str, field: &'static str, values: Vec<f64>) -> ValidationResult<[f64; MONTHS]> {
    let actual = values.len();
    values
        .try_into()
        .map_err(|_| ValidationError::VectorLength {
            sku: sku.to_string(),
            field,
            expected: MONTHS,
            actual,
        })
}

/// Product family: the scope inside which substitution is searched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroup {
    pub name: String,
    #[serde(rename = "totalVolumen", alias = "totalVolume", default)]
    pub total_volume: f64,
    pub skus: Vec<SkuMonthlyData>,
}

impl FamilyGroup {
    pub fn new(name: impl Into<String>, skus: Vec<SkuMonthlyData>) -> Self {
        let total_volume = skus.iter().map(SkuMonthlyData::total_sales).sum();
        Self {
            name: name.into(),
            total_volume,
            skus,
        }
    }
}

/// Root of the input hierarchy, one per customer per analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub matriz: String,
    #[serde(default)]
    pub gerencia: String,
    #[serde(default)]
    pub jefatura: String,
    #[serde(default)]
    pub route: String,
    pub families: Vec<FamilyGroup>,
}

impl ClientNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            matriz: String::new(),
            gerencia: String::new(),
            jefatura: String::new(),
            route: String::new(),
            families: Vec::new(),
        }
    }

    pub fn with_family(mut self, family: FamilyGroup) -> Self {
        self.families.push(family);
        self
    }

    /// Reject negative or non-finite monthly values
    pub fn validate(&self) -> ValidationResult<()> {
        for family in &self.families {
            for sku in &family.skus {
                let vectors = [
                    ("salesVector", &sku.sales_vector),
                    ("metaVector", &sku.meta_vector),
                ];
                for (field, vector) in vectors {
                    if let Some((month, &value)) = vector
                        .iter()
                        .enumerate()
                        .find(|(_, v)| !v.is_finite() || **v < 0.0)
                    {
                        return Err(ValidationError::InvalidMonthlyValue {
                            client: self.id.clone(),
                            family: family.name.clone(),
                            sku: sku.name.clone(),
                            field,
                            month: month + 1,
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Validate a whole batch, stopping at the first bad client
pub fn validate_clients(clients: &[ClientNode]) -> ValidationResult<()> {
    clients.iter().try_for_each(ClientNode::validate)
}
