//! Fluent assertion API for reconstructed trees

use crate::ensemble::{Node, NodeKind, Position, Tree};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a tree
pub fn assert_tree(tree: &Tree) -> TreeAssertion<'_> {
    TreeAssertion { tree }
}

// ============================================================================
// Tree Assertions
// ============================================================================

pub struct TreeAssertion<'a> {
    tree: &'a Tree,
}

impl<'a> TreeAssertion<'a> {
    /// Assert the total number of nodes
    pub fn node_count(self, expected: usize) -> Self {
        assert_eq!(
            self.tree.len(),
            expected,
            "Expected {} nodes, found {}",
            expected,
            self.tree.len()
        );
        self
    }

    pub fn split_count(self, expected: usize) -> Self {
        assert_eq!(self.tree.split_count(), expected, "split count");
        self
    }

    pub fn leaf_count(self, expected: usize) -> Self {
        assert_eq!(self.tree.leaf_count(), expected, "leaf count");
        self
    }

    /// Assert on the root node
    pub fn root<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assertion(NodeAssertion {
            tree: self.tree,
            node: self.tree.root(),
            context: "root".to_string(),
        });
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    tree: &'a Tree,
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn id(self, expected: u32) -> Self {
        assert_eq!(self.node.id, expected, "{}: id", self.context);
        self
    }

    pub fn depth(self, expected: usize) -> Self {
        assert_eq!(self.node.depth, expected, "{}: depth", self.context);
        self
    }

    pub fn position(self, expected: Position) -> Self {
        assert_eq!(self.node.position, expected, "{}: position", self.context);
        self
    }

    /// Assert the node is a leaf with the given response
    pub fn is_leaf(self, expected: f64) -> Self {
        match self.node.kind {
            NodeKind::Leaf { value } => {
                assert_eq!(value, expected, "{}: leaf value", self.context)
            }
            NodeKind::Split { .. } => panic!("{}: expected leaf, found split", self.context),
        }
        self
    }

    /// Assert the node is a split on `variable` (column index) at `threshold`
    pub fn is_split(self, variable: usize, threshold: f64) -> Self {
        match self.node.kind {
            NodeKind::Split {
                variable: actual_variable,
                threshold: actual_threshold,
                ..
            } => {
                assert_eq!(actual_variable, variable, "{}: variable", self.context);
                assert_eq!(actual_threshold, threshold, "{}: threshold", self.context);
            }
            NodeKind::Leaf { .. } => panic!("{}: expected split, found leaf", self.context),
        }
        self
    }

    /// Assert on the `yes` child
    pub fn left<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.child(0, "left", assertion)
    }

    /// Assert on the `no` child
    pub fn right<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.child(1, "right", assertion)
    }

    fn child<F>(self, which: usize, label: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let Some((left, right)) = self.node.children() else {
            panic!("{}: leaf has no {} child", self.context, label);
        };
        let index = if which == 0 { left } else { right };
        let node = self
            .tree
            .node(index)
            .unwrap_or_else(|| panic!("{}: dangling {} child {}", self.context, label, index));
        assertion(NodeAssertion {
            tree: self.tree,
            node,
            context: format!("{}.{}", self.context, label),
        });
        self
    }
}
