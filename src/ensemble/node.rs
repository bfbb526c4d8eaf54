//! Reconstructed tree nodes
//!
//! A [`Tree`] is an arena of [`Node`]s. Children are referenced by arena
//! index; the root always sits at index [`ROOT`]. The declared dump ids are
//! kept for diagnostics only.

use serde::Serialize;

/// Arena index of the root node of every tree.
pub const ROOT: usize = 0;

/// A node's role relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Root,
    /// Reached through the `yes` branch (feature value below the threshold)
    Left,
    /// Reached through the `no` branch
    Right,
}

impl Position {
    /// The single-letter tag used by weight files.
    pub fn tag(self) -> &'static str {
        match self {
            Position::Root => "s",
            Position::Left => "l",
            Position::Right => "r",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Split {
        /// Column index into the ensemble's variable table
        variable: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Declared `missing=` target; never emitted
        #[serde(skip_serializing_if = "Option::is_none")]
        missing: Option<u32>,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Id declared in the dump
    pub id: u32,
    /// Depth taken from the source indentation
    pub depth: usize,
    pub position: Position,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Arena indices of the `(left, right)` children of a split.
    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Split { left, right, .. } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// A fully linked binary tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
    boost_weight: f64,
}

impl Tree {
    /// Wrap an arena whose links were verified by the tree builder.
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Tree {
            nodes,
            boost_weight: 1.0,
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Nodes in materialization (declaration) order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn boost_weight(&self) -> f64 {
        self.boost_weight
    }

    pub fn split_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Depth-first walk, parent before children, left before right.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![ROOT]
            },
        }
    }
}

/// Iterator returned by [`Tree::preorder`]
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree.nodes[index];
        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some((index, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32, depth: usize, position: Position, value: f64) -> Node {
        Node {
            id,
            depth,
            position,
            kind: NodeKind::Leaf { value },
        }
    }

    fn stump() -> Tree {
        // Declared right child first to check the walk follows links, not arena order
        Tree::from_nodes(vec![
            Node {
                id: 0,
                depth: 0,
                position: Position::Root,
                kind: NodeKind::Split {
                    variable: 0,
                    threshold: 1.0,
                    left: 2,
                    right: 1,
                    missing: None,
                },
            },
            leaf(2, 1, Position::Right, 0.2),
            leaf(1, 1, Position::Left, 0.1),
        ])
    }

    #[test]
    fn test_position_tags() {
        assert_eq!(Position::Root.tag(), "s");
        assert_eq!(Position::Left.tag(), "l");
        assert_eq!(Position::Right.tag(), "r");
    }

    #[test]
    fn test_preorder_visits_left_before_right() {
        let tree = stump();
        let ids: Vec<u32> = tree.preorder().map(|(_, n)| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_counts() {
        let tree = stump();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.split_count(), 1);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.max_depth(), 1);
        assert_eq!(tree.boost_weight(), 1.0);
    }
}
