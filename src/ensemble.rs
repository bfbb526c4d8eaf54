//! Format-agnostic model of a boosted tree ensemble
//!
//! The ensemble owns its trees and its variable table. It is built once per
//! conversion and handed to a [`Formatter`](crate::formats::Formatter) for
//! serialization.

pub mod node;
pub mod variables;

pub use node::{Node, NodeKind, Position, Preorder, Tree, ROOT};
pub use variables::{Variable, VariableTable, DEFAULT_TYPE_TAG};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analysis type declared in the weight file's general-info block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Classification,
    Regression,
    Multiclass,
}

impl AnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Classification => "Classification",
            AnalysisType::Regression => "Regression",
            AnalysisType::Multiclass => "Multiclass",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ensemble-level metadata echoed into the weight file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleInfo {
    pub creator: String,
    pub analysis_type: AnalysisType,
    pub boost_type: String,
    pub node_purity_limit: f64,
}

impl Default for EnsembleInfo {
    fn default() -> Self {
        EnsembleInfo {
            creator: "xgboost2TMVA".to_string(),
            analysis_type: AnalysisType::Classification,
            boost_type: "Grad".to_string(),
            node_purity_limit: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ensemble {
    pub info: EnsembleInfo,
    pub variables: VariableTable,
    pub trees: Vec<Tree>,
}

impl Ensemble {
    pub fn new(info: EnsembleInfo, variables: VariableTable, trees: Vec<Tree>) -> Self {
        Ensemble {
            info,
            variables,
            trees,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            trees: self.trees.len(),
            splits: self.trees.iter().map(Tree::split_count).sum(),
            leaves: self.trees.iter().map(Tree::leaf_count).sum(),
            max_depth: self.trees.iter().map(Tree::max_depth).max().unwrap_or(0),
        }
    }
}

/// Aggregate node counts of an ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub trees: usize,
    pub splits: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trees, {} splits, {} leaves, max depth {}",
            self.trees, self.splits, self.leaves, self.max_depth
        )
    }
}
