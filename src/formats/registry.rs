//! Output formats by name
//!
//! Every renderer implements [`Formatter`]; the command line resolves the
//! `--format` value through a [`FormatRegistry`]. Names iterate in sorted
//! order so listings are stable.

use crate::ensemble::Ensemble;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter registered under the requested name
    UnknownFormat {
        name: String,
        available: Vec<String>,
    },
    /// The formatter could not render the ensemble
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat { name, available } => write!(
                f,
                "Unknown format '{name}' (available: {})",
                available.join(", ")
            ),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// A named renderer of reconstructed ensembles
pub trait Formatter: Send + Sync {
    /// Registry key, e.g. `tmva-xml`
    fn name(&self) -> &'static str;

    fn serialize(&self, ensemble: &Ensemble) -> Result<String, FormatError>;

    /// Conventional extension for files holding this format
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn description(&self) -> &'static str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// A registry with nothing registered.
    pub fn new() -> Self {
        FormatRegistry {
            formatters: BTreeMap::new(),
        }
    }

    /// The weight file, tree view and JSON formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::WeightFileFormatter);
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry
    }

    /// Add a formatter; a later registration under the same name wins.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters.insert(formatter.name(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Look up `name`, failing with the list of known formats.
    pub fn resolve(&self, name: &str) -> Result<&dyn Formatter, FormatError> {
        self.get(name).ok_or_else(|| FormatError::UnknownFormat {
            name: name.to_string(),
            available: self.list_formats(),
        })
    }

    pub fn serialize(&self, ensemble: &Ensemble, format: &str) -> Result<String, FormatError> {
        self.resolve(format)?.serialize(ensemble)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        self.formatters.keys().map(|name| name.to_string()).collect()
    }

    /// Registered formatters in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Formatter> {
        self.formatters.values().map(|f| f.as_ref())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
