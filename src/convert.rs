//! Conversion entry points
//!
//! A [`Converter`] turns per-tree dump blocks plus a feature list into an
//! [`Ensemble`], and an ensemble into a weight file. Every call builds its
//! own node registries and variable table, so a converter can be shared
//! across threads freely.
//!
//! ```rust,ignore
//! use xgb2tmva::convert::{Converter, ConvertOptions};
//! use xgb2tmva::ensemble::VariableTable;
//!
//! let variables = VariableTable::from_pairs([("pt", 'F'), ("nJets", 'I')])?;
//! let xml = Converter::new(ConvertOptions::default()).convert(&blocks, variables)?;
//! ```

use crate::dump::{build_tree, split_blocks};
use crate::ensemble::{AnalysisType, Ensemble, EnsembleInfo, VariableTable};
use crate::error::ConvertError;
use crate::formats::serialize_ensemble;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller-controlled conversion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Replace `nan` / `-nan` leaf values with `-999` instead of rejecting them
    pub nan_substitution: bool,
    pub analysis_type: AnalysisType,
    /// Value of the `Creator` info entry
    pub creator: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            nan_substitution: false,
            analysis_type: AnalysisType::Classification,
            creator: EnsembleInfo::default().creator,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Reconstruct every tree block, failing on the first defect.
    pub fn build_ensemble<S: AsRef<str>>(
        &self,
        blocks: &[S],
        variables: VariableTable,
    ) -> Result<Ensemble, ConvertError> {
        let trees = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                build_tree(i, block.as_ref(), &variables, self.options.nan_substitution)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ensemble = Ensemble::new(self.info(), variables, trees);
        debug!(summary = %ensemble.summary(), "built ensemble");
        Ok(ensemble)
    }

    /// Reconstruct a whole-model dump with `booster[N]` markers.
    pub fn build_ensemble_from_dump(
        &self,
        dump: &str,
        variables: VariableTable,
    ) -> Result<Ensemble, ConvertError> {
        let blocks: Vec<&str> = split_blocks(dump)?
            .into_iter()
            .map(|block| block.text)
            .collect();
        self.build_ensemble(&blocks, variables)
    }

    /// Convert tree blocks straight to a weight file.
    pub fn convert<S: AsRef<str>>(
        &self,
        blocks: &[S],
        variables: VariableTable,
    ) -> Result<String, ConvertError> {
        let ensemble = self.build_ensemble(blocks, variables)?;
        Ok(serialize_ensemble(&ensemble))
    }

    /// Convert a whole-model dump straight to a weight file.
    pub fn convert_dump(&self, dump: &str, variables: VariableTable) -> Result<String, ConvertError> {
        let ensemble = self.build_ensemble_from_dump(dump, variables)?;
        Ok(serialize_ensemble(&ensemble))
    }

    fn info(&self) -> EnsembleInfo {
        EnsembleInfo {
            creator: self.options.creator.clone(),
            analysis_type: self.options.analysis_type,
            ..EnsembleInfo::default()
        }
    }
}

/// Convert tree blocks with default options and a `(name, type tag)` feature list.
pub fn convert_blocks<S: AsRef<str>>(
    blocks: &[S],
    features: &[(&str, char)],
) -> Result<String, ConvertError> {
    let variables = VariableTable::from_pairs(features.iter().copied())?;
    Converter::default().convert(blocks, variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::samples;

    #[test]
    fn test_failed_tree_aborts_document() {
        let err = convert_blocks(&[samples::DEPTH_ONE, "0:[a<1] yes=1,no=2"], &[("a", 'F')])
            .unwrap_err();
        assert_eq!(err.tree(), Some(1));
    }

    #[test]
    fn test_duplicate_feature_fails_before_trees() {
        let err = convert_blocks(&[samples::SINGLE_LEAF], &[("a", 'F'), ("a", 'F')]).unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateVariableName { .. }));
    }

    #[test]
    fn test_options_flow_into_info() {
        let converter = Converter::new(ConvertOptions {
            nan_substitution: true,
            analysis_type: AnalysisType::Regression,
            creator: "unit-test".into(),
        });
        let ensemble = converter
            .build_ensemble(&["0:leaf=nan"], VariableTable::default())
            .unwrap();
        assert_eq!(ensemble.info.creator, "unit-test");
        assert_eq!(ensemble.info.analysis_type, AnalysisType::Regression);
        assert_eq!(ensemble.info.boost_type, "Grad");
    }

    #[test]
    fn test_dump_with_markers() {
        let ensemble = Converter::default()
            .build_ensemble_from_dump(samples::MULTI_TREE_DUMP, samples::multi_tree_variables())
            .unwrap();
        assert_eq!(ensemble.trees.len(), 3);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ConvertOptions = serde_json::from_str(r#"{"nan_substitution": true}"#).unwrap();
        assert!(options.nan_substitution);
        assert_eq!(options.creator, "xgboost2TMVA");
    }
}
