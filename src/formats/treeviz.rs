//! Treeviz formatter for reconstructed ensembles
//!
//! One line per node, nesting drawn with connectors, left (`yes`) branch first:
//!
//! ```text
//! tree 0: 2 splits, 3 leaves
//! └─ s #0 [pt < 3.0e+01]
//!    ├─ l #1 [eta < 1.5e+00]
//!    │  ├─ l #3 leaf 1.0e-01
//!    │  └─ r #4 leaf -2.0e-01
//!    └─ r #2 leaf 5.0e-02
//! ```
//!
//! Variable names are truncated to 30 characters.

use super::registry::{FormatError, Formatter};
use super::scientific::format_scientific;
use crate::ensemble::{Ensemble, Node, NodeKind, Tree, VariableTable, ROOT};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(ensemble: &Ensemble) -> String {
    let mut result = String::new();
    for (i, tree) in ensemble.trees.iter().enumerate() {
        result.push_str(&format!(
            "tree {}: {} splits, {} leaves\n",
            i,
            tree.split_count(),
            tree.leaf_count()
        ));
        append_tree(&mut result, tree, &ensemble.variables);
    }
    result
}

fn append_tree(result: &mut String, tree: &Tree, variables: &VariableTable) {
    if tree.is_empty() {
        return;
    }

    // (node index, prefix of its line, is last sibling)
    let mut stack = vec![(ROOT, String::new(), true)];
    while let Some((index, prefix, is_last)) = stack.pop() {
        let Some(node) = tree.node(index) else {
            continue;
        };
        let connector = if is_last { "└─" } else { "├─" };
        result.push_str(&format!(
            "{}{} {} #{} {}\n",
            prefix,
            connector,
            node.position.tag(),
            node.id,
            display_label(node, variables)
        ));

        if let Some((left, right)) = node.children() {
            let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
            stack.push((right, child_prefix.clone(), true));
            stack.push((left, child_prefix, false));
        }
    }
}

fn display_label(node: &Node, variables: &VariableTable) -> String {
    match node.kind {
        NodeKind::Split {
            variable,
            threshold,
            ..
        } => {
            let name = variables
                .get(variable)
                .map(|v| truncate(&v.name, 30))
                .unwrap_or_else(|| format!("#{variable}"));
            format!("[{} < {}]", name, format_scientific(threshold))
        }
        NodeKind::Leaf { value } => format!("leaf {}", format_scientific(value)),
    }
}

/// Formatter for the treeviz view
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &'static str {
        "treeviz"
    }

    fn serialize(&self, ensemble: &Ensemble) -> Result<String, FormatError> {
        Ok(to_treeviz_str(ensemble))
    }

    fn description(&self) -> &'static str {
        "One line per node tree view"
    }
}
