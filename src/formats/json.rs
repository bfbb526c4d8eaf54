//! JSON rendering of the reconstructed ensemble model

use super::registry::{FormatError, Formatter};
use crate::ensemble::Ensemble;

pub fn to_json_string(ensemble: &Ensemble) -> Result<String, FormatError> {
    serde_json::to_string_pretty(ensemble)
        .map_err(|e| FormatError::SerializationError(e.to_string()))
}

/// Formatter for the JSON model dump
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, ensemble: &Ensemble) -> Result<String, FormatError> {
        to_json_string(ensemble)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Reconstructed ensemble as JSON"
    }
}
