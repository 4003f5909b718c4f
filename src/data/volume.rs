use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// A client's total volume for the analysed period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVolume {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub volume: f64,
}

impl ClientVolume {
    pub fn new(id: impl Into<String>, volume: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            volume,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>, volume: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            volume,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(ValidationError::InvalidVolume {
                client: self.id.clone(),
                value: self.volume,
            });
        }
        Ok(())
    }
}

pub fn validate_volumes(clients: &[ClientVolume]) -> ValidationResult<()> {
    clients.iter().try_for_each(ClientVolume::validate)
}
