//! Output formats for reconstructed ensembles
//!
//! - `tmva-xml`: the TMVA BDT weight file
//! - `treeviz`: a one-line-per-node tree view for inspection
//! - `json`: the format-agnostic ensemble model

pub mod json;
pub mod registry;
pub mod scientific;
pub mod treeviz;
pub mod weight_file;

pub use json::{to_json_string, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use scientific::{format_scientific, format_scientific_with_precision};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
pub use weight_file::{
    serialize_ensemble, WeightFileFormatter, LEAF_NODE_TYPE, LEAF_VARIABLE, SPLIT_NODE_TYPE,
};
