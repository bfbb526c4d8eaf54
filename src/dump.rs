//! Reading tree dumps
//!
//! Raw dump text flows one way through this module:
//!
//! 1. [`blocks`] splits a whole-model dump at `booster[N]` markers
//! 2. [`line_classification`] matches each line against the leaf / split grammar
//! 3. [`tree_builder`] attaches matched nodes through the per-tree [`registry`]

pub mod blocks;
pub mod line_classification;
pub mod registry;
pub mod tree_builder;

pub use blocks::{split_blocks, DumpBlock};
pub use line_classification::{classify_line, DumpLine, LineKind, FLOAT_PATTERN, NAN_SENTINEL};
pub use registry::{NodeRegistry, Placement, RegistryConflict, ROOT_ID};
pub use tree_builder::{build_tree, TreeBuilder};
