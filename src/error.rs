//! Errors raised while reconstructing and emitting a tree ensemble
//!
//! Every condition is fatal for the ensemble being converted: a failed tree
//! aborts the whole document. Each variant carries the tree index and enough
//! of the source (line text, node id, feature name) to find the defect in
//! the dump.

/// Error type for dump-to-weight-file conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// A line matched neither the leaf nor the split grammar.
    #[error("tree {tree}, line {line}: malformed dump line `{text}`")]
    MalformedLine {
        tree: usize,
        line: usize,
        text: String,
    },

    /// A node was declared before any split claimed it as a child.
    #[error("tree {tree}, line {line}: node {node} is not a child of any earlier split")]
    OrphanNode { tree: usize, line: usize, node: u32 },

    /// A child id was claimed by more than one split (or by the same split twice).
    #[error(
        "tree {tree}, line {line}: node {node} claimed as child of node {parent}, but {}",
        describe_previous_claim(.previous_parent)
    )]
    DuplicateChildClaim {
        tree: usize,
        line: usize,
        node: u32,
        parent: u32,
        previous_parent: Option<u32>,
    },

    /// The same node id was materialized twice within one tree.
    #[error("tree {tree}, line {line}: node {node} is declared more than once")]
    DuplicateNodeDeclaration { tree: usize, line: usize, node: u32 },

    /// Child references remained unresolved at the end of the tree block.
    #[error("tree {tree}: nodes {} were referenced but never declared", join_ids(.missing))]
    IncompleteTree { tree: usize, missing: Vec<u32> },

    /// A split referenced a feature that is not in the variable table.
    #[error("tree {tree}, node {node}: unknown variable `{name}`")]
    UnknownVariable { tree: usize, node: u32, name: String },

    /// The supplied feature list contains the same name twice.
    #[error("variable `{name}` appears at positions {first} and {second}")]
    DuplicateVariableName {
        name: String,
        first: usize,
        second: usize,
    },
}

impl ConvertError {
    /// Index of the tree the error was raised in, if it belongs to one.
    pub fn tree(&self) -> Option<usize> {
        match self {
            ConvertError::MalformedLine { tree, .. }
            | ConvertError::OrphanNode { tree, .. }
            | ConvertError::DuplicateChildClaim { tree, .. }
            | ConvertError::DuplicateNodeDeclaration { tree, .. }
            | ConvertError::IncompleteTree { tree, .. }
            | ConvertError::UnknownVariable { tree, .. } => Some(*tree),
            ConvertError::DuplicateVariableName { .. } => None,
        }
    }
}

fn describe_previous_claim(previous_parent: &Option<u32>) -> String {
    match previous_parent {
        Some(parent) => format!("it is already a child of node {parent}"),
        None => "it is the tree root".to_string(),
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
