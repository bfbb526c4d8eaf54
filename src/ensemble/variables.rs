//! Variable Index Table
//!
//! Maps feature names to zero-based column indices. The index of a variable
//! is its position in the caller-supplied feature list.

use crate::dump::{classify_line, LineKind};
use crate::error::ConvertError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Type tag used when none is declared.
pub const DEFAULT_TYPE_TAG: char = 'F';

/// One input feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// One-character type tag (`F` float, `I` integer); carried through as-is
    #[serde(rename = "type", default = "default_type_tag")]
    pub type_tag: char,
}

fn default_type_tag() -> char {
    DEFAULT_TYPE_TAG
}

impl Variable {
    pub fn new(name: impl Into<String>, type_tag: char) -> Self {
        Variable {
            name: name.into(),
            type_tag,
        }
    }
}

/// Feature list plus a name lookup. Serializes as the bare list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    variables: Vec<Variable>,
    indices: HashMap<String, usize>,
}

impl Serialize for VariableTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.variables.serialize(serializer)
    }
}

impl VariableTable {
    /// Build the table, rejecting repeated names.
    pub fn new(variables: impl IntoIterator<Item = Variable>) -> Result<Self, ConvertError> {
        let mut table = VariableTable::default();
        for variable in variables {
            let position = table.variables.len();
            if let Some(&first) = table.indices.get(&variable.name) {
                return Err(ConvertError::DuplicateVariableName {
                    name: variable.name,
                    first,
                    second: position,
                });
            }
            table.indices.insert(variable.name.clone(), position);
            table.variables.push(variable);
        }
        Ok(table)
    }

    /// Build the table from `(name, type tag)` pairs.
    pub fn from_pairs<I, N>(pairs: I) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = (N, char)>,
        N: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, type_tag)| Variable::new(name, type_tag)),
        )
    }

    /// Collect split variables in order of first appearance, all tagged `F`.
    ///
    /// Lines that do not classify are skipped here; they are reported when the
    /// trees are built.
    pub fn infer<S: AsRef<str>>(blocks: &[S]) -> Self {
        let mut table = VariableTable::default();
        for block in blocks {
            for line in block.as_ref().lines() {
                let Some(parsed) = classify_line(line, false) else {
                    continue;
                };
                if let LineKind::Split { variable, .. } = parsed.kind {
                    if !table.indices.contains_key(&variable) {
                        table.indices.insert(variable.clone(), table.variables.len());
                        table
                            .variables
                            .push(Variable::new(variable, DEFAULT_TYPE_TAG));
                    }
                }
            }
        }
        table
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Variable)> {
        self.variables.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_position() {
        let table = VariableTable::from_pairs([("pt", 'F'), ("nJets", 'I'), ("eta", 'F')]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.index_of("pt"), Some(0));
        assert_eq!(table.index_of("nJets"), Some(1));
        assert_eq!(table.index_of("eta"), Some(2));
        assert_eq!(table.get(1).map(|v| v.type_tag), Some('I'));
        assert_eq!(table.index_of("phi"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = VariableTable::from_pairs([("pt", 'F'), ("eta", 'F'), ("pt", 'I')]).unwrap_err();
        assert_eq!(
            err,
            ConvertError::DuplicateVariableName {
                name: "pt".into(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn test_infer_uses_first_appearance_order() {
        let blocks = [
            "0:[b<1] yes=1,no=2\n\t1:[a<2] yes=3,no=4\n",
            "0:[c<1] yes=1,no=2\n\t1:[b<0] yes=3,no=4\n",
        ];
        let table = VariableTable::infer(&blocks);
        let names: Vec<&str> = table.iter().map(|(_, v)| v.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(table.iter().all(|(_, v)| v.type_tag == DEFAULT_TYPE_TAG));
    }

    #[test]
    fn test_deserialize_defaults_type_tag() {
        let variable: Variable = serde_json::from_str(r#"{"name": "mass"}"#).unwrap();
        assert_eq!(variable, Variable::new("mass", 'F'));
    }

    #[test]
    fn test_serializes_as_feature_list() {
        let table = VariableTable::from_pairs([("pt", 'F'), ("nJets", 'I')]).unwrap();
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"name": "pt", "type": "F"},
                {"name": "nJets", "type": "I"},
            ])
        );
    }
}
