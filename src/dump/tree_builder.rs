//! Tree Builder - reconstructs one tree from its dump block
//!
//! Lines are consumed in declaration order. Each classified line is
//! materialized at the arena slot its parent reserved through the
//! [`NodeRegistry`]; a split then claims its `yes` / `no` ids for later
//! lines. Declaration order does not need to match tree order, and no
//! recursion is involved.
//!
//! # Responsibilities
//!
//! 1. Attach every declared node under the split that claimed it
//! 2. Resolve split variable names through the [`VariableTable`]
//! 3. Reject orphans, duplicate claims, redeclarations and dangling references

use super::line_classification::{classify_line, LineKind};
use super::registry::{NodeRegistry, RegistryConflict};
use crate::ensemble::{Node, NodeKind, Position, Tree, VariableTable};
use crate::error::ConvertError;
use tracing::{debug, trace, warn};

/// A materialized node whose children may not be declared yet
#[derive(Debug)]
struct PartialNode {
    id: u32,
    depth: usize,
    position: Position,
    kind: PartialKind,
}

#[derive(Debug)]
enum PartialKind {
    Leaf {
        value: f64,
    },
    Split {
        variable: usize,
        threshold: f64,
        missing: Option<u32>,
        left: Option<usize>,
        right: Option<usize>,
    },
}

/// Incremental builder for a single tree.
pub struct TreeBuilder<'v> {
    tree: usize,
    variables: &'v VariableTable,
    nan_substitution: bool,
    registry: NodeRegistry,
    nodes: Vec<PartialNode>,
    failure: Option<ConvertError>,
}

impl<'v> TreeBuilder<'v> {
    /// Start a tree; `tree` is its index in the ensemble, used for error context.
    pub fn new(tree: usize, variables: &'v VariableTable, nan_substitution: bool) -> Self {
        TreeBuilder {
            tree,
            variables,
            nan_substitution,
            registry: NodeRegistry::new(),
            nodes: Vec::new(),
            failure: None,
        }
    }

    /// Consume one line of the block. `line_number` is 1-based within the block.
    ///
    /// Blank lines are ignored. After the first error the builder is failed:
    /// every later `push_line` and [`finish`](Self::finish) returns that error.
    pub fn push_line(&mut self, line_number: usize, line: &str) -> Result<(), ConvertError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let result = self.apply_line(line_number, line);
        if let Err(err) = &result {
            self.failure = Some(err.clone());
        }
        result
    }

    fn apply_line(&mut self, line_number: usize, line: &str) -> Result<(), ConvertError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let parsed = classify_line(line, self.nan_substitution).ok_or_else(|| {
            ConvertError::MalformedLine {
                tree: self.tree,
                line: line_number,
                text: line.trim_end().to_string(),
            }
        })?;
        trace!(tree = self.tree, line = line_number, id = parsed.id, "matched dump line");

        // Every check runs before the registry or the arena changes
        let placement = self
            .registry
            .placement(parsed.id)
            .map_err(|conflict| match conflict {
                RegistryConflict::AlreadyAttached => ConvertError::DuplicateNodeDeclaration {
                    tree: self.tree,
                    line: line_number,
                    node: parsed.id,
                },
                _ => ConvertError::OrphanNode {
                    tree: self.tree,
                    line: line_number,
                    node: parsed.id,
                },
            })?;

        let (kind, children) = match parsed.kind {
            LineKind::Leaf { value } => (PartialKind::Leaf { value }, None),
            LineKind::Split {
                variable,
                threshold,
                yes,
                no,
                missing,
            } => {
                let variable = self.variables.index_of(&variable).ok_or_else(|| {
                    ConvertError::UnknownVariable {
                        tree: self.tree,
                        node: parsed.id,
                        name: variable.clone(),
                    }
                })?;
                self.check_claims(line_number, parsed.id, yes, no)?;
                let kind = PartialKind::Split {
                    variable,
                    threshold,
                    missing,
                    left: None,
                    right: None,
                };
                (kind, Some((yes, no)))
            }
        };

        let index = self.nodes.len();
        if let Some((parent_index, parent_id)) = placement.parent {
            let expected = self.nodes[parent_index].depth + 1;
            if parsed.depth != expected {
                warn!(
                    tree = self.tree,
                    line = line_number,
                    node = parsed.id,
                    parent = parent_id,
                    depth = parsed.depth,
                    expected,
                    "indentation does not match tree depth; keeping source depth"
                );
            }
            self.link(parent_index, placement.position, index);
        }

        self.registry
            .attach(parsed.id, index)
            .map_err(|_| ConvertError::OrphanNode {
                tree: self.tree,
                line: line_number,
                node: parsed.id,
            })?;
        self.nodes.push(PartialNode {
            id: parsed.id,
            depth: parsed.depth,
            position: placement.position,
            kind,
        });

        if let Some((yes, no)) = children {
            self.claim(line_number, yes, (index, parsed.id), Position::Left)?;
            self.claim(line_number, no, (index, parsed.id), Position::Right)?;
        }

        Ok(())
    }

    /// Close the tree, failing if any claimed child was never declared.
    pub fn finish(self) -> Result<Tree, ConvertError> {
        if let Some(err) = self.failure {
            return Err(err);
        }

        let missing = self.registry.unresolved();
        if !missing.is_empty() {
            return Err(ConvertError::IncompleteTree {
                tree: self.tree,
                missing,
            });
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for partial in self.nodes {
            let kind = match partial.kind {
                PartialKind::Leaf { value } => NodeKind::Leaf { value },
                PartialKind::Split {
                    variable,
                    threshold,
                    missing,
                    left: Some(left),
                    right: Some(right),
                } => NodeKind::Split {
                    variable,
                    threshold,
                    left,
                    right,
                    missing,
                },
                // Unreachable once the registry is drained; reported rather than panicking
                PartialKind::Split { .. } => {
                    return Err(ConvertError::IncompleteTree {
                        tree: self.tree,
                        missing: vec![partial.id],
                    })
                }
            };
            nodes.push(Node {
                id: partial.id,
                depth: partial.depth,
                position: partial.position,
                kind,
            });
        }

        let tree = Tree::from_nodes(nodes);
        debug!(
            tree = self.tree,
            nodes = tree.len(),
            splits = tree.split_count(),
            leaves = tree.leaf_count(),
            "reconstructed tree"
        );
        Ok(tree)
    }

    fn link(&mut self, parent: usize, position: Position, child: usize) {
        if let PartialKind::Split { left, right, .. } = &mut self.nodes[parent].kind {
            match position {
                Position::Left => *left = Some(child),
                Position::Right => *right = Some(child),
                Position::Root => {}
            }
        }
    }

    /// Both children must be unclaimed and distinct.
    fn check_claims(
        &self,
        line_number: usize,
        parent: u32,
        yes: u32,
        no: u32,
    ) -> Result<(), ConvertError> {
        let conflict = |node: u32, previous_parent: Option<u32>| {
            ConvertError::DuplicateChildClaim {
                tree: self.tree,
                line: line_number,
                node,
                parent,
                previous_parent,
            }
        };
        for child in [yes, no] {
            if let Err(RegistryConflict::AlreadyClaimed { previous_parent }) =
                self.registry.check_claim(child)
            {
                return Err(conflict(child, previous_parent));
            }
        }
        if yes == no {
            return Err(conflict(no, Some(parent)));
        }
        Ok(())
    }

    fn claim(
        &mut self,
        line_number: usize,
        child: u32,
        parent: (usize, u32),
        position: Position,
    ) -> Result<(), ConvertError> {
        self.registry
            .claim(child, parent, position)
            .map_err(|conflict| {
                let previous_parent = match conflict {
                    RegistryConflict::AlreadyClaimed { previous_parent } => previous_parent,
                    _ => None,
                };
                ConvertError::DuplicateChildClaim {
                    tree: self.tree,
                    line: line_number,
                    node: child,
                    parent: parent.1,
                    previous_parent,
                }
            })
    }
}

/// Reconstruct one tree from a block of dump text.
pub fn build_tree(
    tree: usize,
    block: &str,
    variables: &VariableTable,
    nan_substitution: bool,
) -> Result<Tree, ConvertError> {
    let mut builder = TreeBuilder::new(tree, variables, nan_substitution);
    for (i, line) in block.lines().enumerate() {
        builder.push_line(i + 1, line)?;
    }
    builder.finish()
}
