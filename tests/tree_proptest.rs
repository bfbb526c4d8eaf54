//! Property-based tests for tree reconstruction
//!
//! Random binary trees are numbered breadth-first (the way the training
//! library numbers them), printed depth-first with tab indentation, and fed
//! back through the converter. The rebuilt tree must have the generated shape
//! no matter how far apart a node's declaration is from its parent's.

use proptest::prelude::*;
use std::fmt::Write;
use xgb2tmva::dump::build_tree;
use xgb2tmva::ensemble::{NodeKind, Position, Tree, VariableTable, ROOT};
use xgb2tmva::formats::serialize_ensemble;
use xgb2tmva::Converter;

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Leaf(f64),
    Split {
        variable: usize,
        threshold: f64,
        left: Box<Shape>,
        right: Box<Shape>,
    },
}

impl Shape {
    fn splits(&self) -> usize {
        match self {
            Shape::Leaf(_) => 0,
            Shape::Split { left, right, .. } => 1 + left.splits() + right.splits(),
        }
    }

    fn leaves(&self) -> usize {
        match self {
            Shape::Leaf(_) => 1,
            Shape::Split { left, right, .. } => left.leaves() + right.leaves(),
        }
    }
}

/// Eighths keep every generated value exact in decimal text
fn value_strategy() -> impl Strategy<Value = f64> {
    (-800i32..800).prop_map(|v| f64::from(v) / 8.0)
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    value_strategy()
        .prop_map(Shape::Leaf)
        .prop_recursive(6, 64, 2, |inner| {
            (0usize..4, value_strategy(), inner.clone(), inner).prop_map(
                |(variable, threshold, left, right)| Shape::Split {
                    variable,
                    threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            )
        })
}

fn variables() -> VariableTable {
    VariableTable::from_pairs([("f0", 'F'), ("f1", 'F'), ("f2", 'I'), ("f3", 'F')]).unwrap()
}

/// Render a shape as a dump block: breadth-first ids, depth-first lines.
fn render(shape: &Shape) -> String {
    let mut order: Vec<&Shape> = vec![shape];
    let mut children: Vec<Option<(u32, u32)>> = Vec::new();
    let mut next = 0;
    while next < order.len() {
        let node: &Shape = order[next];
        match node {
            Shape::Leaf(_) => children.push(None),
            Shape::Split { left, right, .. } => {
                let yes = order.len() as u32;
                order.push(left.as_ref());
                order.push(right.as_ref());
                children.push(Some((yes, yes + 1)));
            }
        }
        next += 1;
    }

    let mut text = String::new();
    let mut stack = vec![(0u32, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        text.push_str(&"\t".repeat(depth));
        match (order[id as usize], children[id as usize]) {
            (Shape::Split { variable, threshold, .. }, Some((yes, no))) => {
                writeln!(
                    text,
                    "{id}:[f{variable}<{threshold}] yes={yes},no={no},missing={yes}"
                )
                .unwrap();
                stack.push((no, depth + 1));
                stack.push((yes, depth + 1));
            }
            (Shape::Leaf(value), _) => writeln!(text, "{id}:leaf={value}").unwrap(),
            (Shape::Split { .. }, None) => unreachable!("splits always get child ids"),
        }
    }
    text
}

/// Read the rebuilt tree back into a shape, starting at `index`.
fn shape_of(tree: &Tree, index: usize) -> Shape {
    let node = tree.node(index).unwrap();
    match node.kind {
        NodeKind::Leaf { value } => Shape::Leaf(value),
        NodeKind::Split {
            variable,
            threshold,
            left,
            right,
            ..
        } => Shape::Split {
            variable,
            threshold,
            left: Box::new(shape_of(tree, left)),
            right: Box::new(shape_of(tree, right)),
        },
    }
}

proptest! {
    #[test]
    fn test_rebuilt_tree_has_generated_shape(shape in shape_strategy()) {
        let block = render(&shape);
        let tree = build_tree(0, &block, &variables(), false).unwrap();

        prop_assert_eq!(shape_of(&tree, ROOT), shape.clone());
        prop_assert_eq!(tree.split_count(), shape.splits());
        prop_assert_eq!(tree.leaf_count(), shape.leaves());
    }

    #[test]
    fn test_single_root_and_dense_ids(shape in shape_strategy()) {
        let tree = build_tree(0, &render(&shape), &variables(), false).unwrap();

        let roots = tree
            .nodes()
            .iter()
            .filter(|n| n.position == Position::Root)
            .count();
        prop_assert_eq!(roots, 1);
        prop_assert_eq!(tree.root().id, 0);

        let mut ids: Vec<u32> = tree.nodes().iter().map(|n| n.id).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (0..tree.len() as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn test_preorder_depths_step_by_one(shape in shape_strategy()) {
        let tree = build_tree(0, &render(&shape), &variables(), false).unwrap();
        for (_, node) in tree.preorder() {
            if let Some((left, right)) = node.children() {
                prop_assert_eq!(tree.node(left).unwrap().depth, node.depth + 1);
                prop_assert_eq!(tree.node(right).unwrap().depth, node.depth + 1);
            }
        }
    }

    #[test]
    fn test_weight_file_node_types(shapes in prop::collection::vec(shape_strategy(), 0..4)) {
        let blocks: Vec<String> = shapes.iter().map(render).collect();
        let converter = Converter::default();
        let ensemble = converter.build_ensemble(&blocks, variables()).unwrap();
        let xml = serialize_ensemble(&ensemble);

        let splits: usize = shapes.iter().map(Shape::splits).sum();
        let leaves: usize = shapes.iter().map(Shape::leaves).sum();
        prop_assert_eq!(xml.matches("nType=\"1\"").count(), splits);
        prop_assert_eq!(xml.matches("nType=\"-99\"").count(), leaves);
        let header = format!("<Weights NTrees=\"{}\" AnalysisType=\"1\">", shapes.len());
        prop_assert!(xml.contains(&header));

        // Same input, same bytes
        prop_assert_eq!(converter.convert(&blocks, variables()).unwrap(), xml);
    }
}
