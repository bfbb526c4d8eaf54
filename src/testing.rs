//! Testing utilities
//!
//! - [`samples`]: verified dump text and matching variable tables
//! - [`assert_tree`]: fluent assertions over a reconstructed [`Tree`](crate::ensemble::Tree)
//!
//! ```rust,ignore
//! let tree = build_tree(0, samples::DEPTH_ONE, &samples::ab_variables(), false)?;
//! assert_tree(&tree).node_count(3).root(|root| {
//!     root.is_split(0, 1.0)
//!         .left(|n| { n.depth(1).is_leaf(0.1); })
//!         .right(|n| { n.depth(1).is_leaf(0.2); });
//! });
//! ```

pub mod samples;
pub mod tree_assertions;

pub use tree_assertions::{assert_tree, NodeAssertion, TreeAssertion};
