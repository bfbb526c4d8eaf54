//! # xgb2tmva
//!
//! Converts the text dump of an XGBoost tree ensemble into a TMVA BDT
//! weight file.
//!
//! The dump is a flat list of lines per tree; parent/child links are only
//! given as `yes=` / `no=` ids, which may point to lines declared later. The
//! [`dump`] module reconstructs each tree, [`ensemble`] holds the result in a
//! format-agnostic model, and [`formats`] serializes it.
//!
//! ```rust,ignore
//! use xgb2tmva::convert::convert_blocks;
//!
//! let xml = convert_blocks(&booster.get_dump(), &[("pt", 'F'), ("nJets", 'I')])?;
//! ```

pub mod convert;
pub mod dump;
pub mod ensemble;
pub mod error;
pub mod formats;
pub mod testing;

pub use convert::{convert_blocks, ConvertOptions, Converter};
pub use ensemble::{Ensemble, Variable, VariableTable};
pub use error::ConvertError;
