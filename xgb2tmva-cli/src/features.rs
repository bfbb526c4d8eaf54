//! Feature list files
//!
//! The feature list fixes the column index of every variable a split can
//! name. Three layouts are accepted, picked by file extension:
//!
//! - `.json`: `[{"name": "pt", "type": "F"}, ...]`
//! - `.yaml` / `.yml`: the same records as a YAML sequence
//! - anything else: one feature per line, `name` or `name TYPE`; blank lines
//!   and `#` comments are skipped
//!
//! A missing `type` defaults to `F`.

use std::fs;
use std::path::{Path, PathBuf};
use xgb2tmva::ensemble::DEFAULT_TYPE_TAG;
use xgb2tmva::{ConvertError, Variable, VariableTable};

#[derive(Debug, thiserror::Error)]
pub enum FeatureFileError {
    #[error("cannot read feature file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON feature list {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid YAML feature list {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{path}, line {line}: expected `name` or `name TYPE`, found `{text}`")]
    Text {
        path: PathBuf,
        line: usize,
        text: String,
    },
    #[error(transparent)]
    Table(#[from] ConvertError),
}

/// Load a feature list and build the variable table from it.
pub fn load_feature_file(path: &Path) -> Result<VariableTable, FeatureFileError> {
    let content = fs::read_to_string(path).map_err(|source| FeatureFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let variables: Vec<Variable> = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|source| FeatureFileError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|source| FeatureFileError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => parse_text_features(path, &content)?,
    };

    Ok(VariableTable::new(variables)?)
}

fn parse_text_features(path: &Path, content: &str) -> Result<Vec<Variable>, FeatureFileError> {
    let mut variables = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let name = fields.next().unwrap_or(line);
        let type_tag = match (fields.next(), fields.next()) {
            (None, _) => Some(DEFAULT_TYPE_TAG),
            (Some(tag), None) => single_char(tag),
            _ => None,
        };
        let Some(type_tag) = type_tag else {
            return Err(FeatureFileError::Text {
                path: path.to_path_buf(),
                line: i + 1,
                text: raw.trim_end().to_string(),
            });
        };
        variables.push(Variable::new(name, type_tag));
    }
    Ok(variables)
}

fn single_char(tag: &str) -> Option<char> {
    let mut chars = tag.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
