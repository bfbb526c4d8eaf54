//! TMVA weight file serialization
//!
//! Writes an [`Ensemble`] as the XML document read by TMVA's BDT method.
//! The whole document is built in memory before it is returned.
//!
//! ## Format
//!
//! ```text
//! <?xml version="1.0"?>
//! <MethodSetup Method="BDT::BDT">
//!   <Variables NVar="1">
//!     <Variable VarIndex="0" Type="F" Expression="a" Label="a" Title="a" Unit="" Internal="a" Min="0.0e+00" Max="0.0e+00"/>
//!   </Variables>
//!   <GeneralInfo>
//!     <Info name="Creator" value="xgboost2TMVA"/>
//!     <Info name="AnalysisType" value="Classification"/>
//!   </GeneralInfo>
//!   <Options>
//!     <Option name="NodePurityLimit" modified="No">5.00e-01</Option>
//!     <Option name="BoostType" modified="Yes">Grad</Option>
//!   </Options>
//!   <Weights NTrees="1" AnalysisType="1">
//!     <BinaryTree type="DecisionTree" boostWeight="1.0e+00" itree="0">
//!       <Node pos="s" depth="0" NCoef="0" IVar="0" Cut="1.0e+00" cType="1" res="0.0e+00" rms="0.0e+00" purity="0.0e+00" nType="1">
//!         <Node pos="l" depth="1" NCoef="0" IVar="-1" Cut="0.0e+00" cType="1" res="1.0e-01" rms="0.0e+00" purity="0.0e+00" nType="-99"/>
//!         <Node pos="r" depth="1" NCoef="0" IVar="-1" Cut="0.0e+00" cType="1" res="2.0e-01" rms="0.0e+00" purity="0.0e+00" nType="-99"/>
//!       </Node>
//!     </BinaryTree>
//!   </Weights>
//! </MethodSetup>
//! ```
//!
//! Nodes nest inside their parent, left child first. Fields the converter
//! does not compute (`rms`, `purity`, variable ranges) are written as zeros.

use super::registry::{FormatError, Formatter};
use super::scientific::{format_scientific, format_scientific_with_precision};
use crate::ensemble::{Ensemble, Node, NodeKind, Tree, ROOT};

/// `nType` flag of split nodes
pub const SPLIT_NODE_TYPE: i32 = 1;
/// `nType` flag of leaf nodes
pub const LEAF_NODE_TYPE: i32 = -99;
/// `IVar` written for leaves
pub const LEAF_VARIABLE: i32 = -1;

const ZERO: &str = "0.0e+00";

type Attributes<'a> = Vec<(&'a str, String)>;

/// Indented XML writer
struct WeightFileWriter {
    output: String,
    indent_level: usize,
}

impl WeightFileWriter {
    fn new() -> Self {
        WeightFileWriter {
            output: String::from("<?xml version=\"1.0\"?>\n"),
            indent_level: 0,
        }
    }

    fn start_line(&mut self, tag: &str, attributes: &[(&str, String)]) {
        self.output.push_str(&"  ".repeat(self.indent_level));
        self.output.push('<');
        self.output.push_str(tag);
        for (name, value) in attributes {
            self.output.push(' ');
            self.output.push_str(name);
            self.output.push_str("=\"");
            self.output.push_str(&escape_xml(value));
            self.output.push('"');
        }
    }

    fn open_element(&mut self, tag: &str, attributes: &[(&str, String)]) {
        self.start_line(tag, attributes);
        self.output.push_str(">\n");
        self.indent_level += 1;
    }

    fn empty_element(&mut self, tag: &str, attributes: &[(&str, String)]) {
        self.start_line(tag, attributes);
        self.output.push_str("/>\n");
    }

    fn text_element(&mut self, tag: &str, attributes: &[(&str, String)], text: &str) {
        self.start_line(tag, attributes);
        self.output
            .push_str(&format!(">{}</{tag}>\n", escape_xml(text)));
    }

    fn close_element(&mut self, tag: &str) {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.output.push_str(&"  ".repeat(self.indent_level));
        self.output.push_str(&format!("</{tag}>\n"));
    }

    fn write_variables(&mut self, ensemble: &Ensemble) {
        self.open_element(
            "Variables",
            &[("NVar", ensemble.variables.len().to_string())],
        );
        for (index, variable) in ensemble.variables.iter() {
            let name = &variable.name;
            self.empty_element(
                "Variable",
                &[
                    ("VarIndex", index.to_string()),
                    ("Type", variable.type_tag.to_string()),
                    ("Expression", name.clone()),
                    ("Label", name.clone()),
                    ("Title", name.clone()),
                    ("Unit", String::new()),
                    ("Internal", name.clone()),
                    ("Min", ZERO.to_string()),
                    ("Max", ZERO.to_string()),
                ],
            );
        }
        self.close_element("Variables");
    }

    fn write_general_info(&mut self, ensemble: &Ensemble) {
        self.open_element("GeneralInfo", &[]);
        self.empty_element(
            "Info",
            &[
                ("name", "Creator".to_string()),
                ("value", ensemble.info.creator.clone()),
            ],
        );
        self.empty_element(
            "Info",
            &[
                ("name", "AnalysisType".to_string()),
                ("value", ensemble.info.analysis_type.as_str().to_string()),
            ],
        );
        self.close_element("GeneralInfo");
    }

    fn write_options(&mut self, ensemble: &Ensemble) {
        self.open_element("Options", &[]);
        self.text_element(
            "Option",
            &[
                ("name", "NodePurityLimit".to_string()),
                ("modified", "No".to_string()),
            ],
            &format_scientific_with_precision(ensemble.info.node_purity_limit, 2),
        );
        self.text_element(
            "Option",
            &[
                ("name", "BoostType".to_string()),
                ("modified", "Yes".to_string()),
            ],
            &ensemble.info.boost_type,
        );
        self.close_element("Options");
    }

    fn write_weights(&mut self, ensemble: &Ensemble) {
        self.open_element(
            "Weights",
            &[
                ("NTrees", ensemble.trees.len().to_string()),
                ("AnalysisType", "1".to_string()),
            ],
        );
        for (itree, tree) in ensemble.trees.iter().enumerate() {
            self.open_element(
                "BinaryTree",
                &[
                    ("type", "DecisionTree".to_string()),
                    ("boostWeight", format_scientific(tree.boost_weight())),
                    ("itree", itree.to_string()),
                ],
            );
            self.write_tree(tree);
            self.close_element("BinaryTree");
        }
        self.close_element("Weights");
    }

    /// Depth-first with an explicit stack; a split stays open until both children are written.
    fn write_tree(&mut self, tree: &Tree) {
        enum Step {
            Open(usize),
            Close,
        }

        if tree.is_empty() {
            return;
        }

        let mut stack = vec![Step::Open(ROOT)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Close => self.close_element("Node"),
                Step::Open(index) => {
                    let Some(node) = tree.node(index) else {
                        continue;
                    };
                    let attributes = node_attributes(node);
                    match node.children() {
                        Some((left, right)) => {
                            self.open_element("Node", &attributes);
                            stack.push(Step::Close);
                            stack.push(Step::Open(right));
                            stack.push(Step::Open(left));
                        }
                        None => self.empty_element("Node", &attributes),
                    }
                }
            }
        }
    }
}

fn node_attributes(node: &Node) -> Attributes<'static> {
    let (variable, cut, response, node_type) = match node.kind {
        NodeKind::Split {
            variable,
            threshold,
            ..
        } => (
            variable.to_string(),
            format_scientific(threshold),
            ZERO.to_string(),
            SPLIT_NODE_TYPE,
        ),
        NodeKind::Leaf { value } => (
            LEAF_VARIABLE.to_string(),
            ZERO.to_string(),
            format_scientific(value),
            LEAF_NODE_TYPE,
        ),
    };

    vec![
        ("pos", node.position.tag().to_string()),
        ("depth", node.depth.to_string()),
        ("NCoef", "0".to_string()),
        ("IVar", variable),
        ("Cut", cut),
        ("cType", "1".to_string()),
        ("res", response),
        ("rms", ZERO.to_string()),
        ("purity", ZERO.to_string()),
        ("nType", node_type.to_string()),
    ]
}

/// Serialize an ensemble to a TMVA weight file.
pub fn serialize_ensemble(ensemble: &Ensemble) -> String {
    let mut writer = WeightFileWriter::new();
    writer.open_element("MethodSetup", &[("Method", "BDT::BDT".to_string())]);
    writer.write_variables(ensemble);
    writer.write_general_info(ensemble);
    writer.write_options(ensemble);
    writer.write_weights(ensemble);
    writer.close_element("MethodSetup");
    writer.output
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Formatter for TMVA weight files
pub struct WeightFileFormatter;

impl Formatter for WeightFileFormatter {
    fn name(&self) -> &'static str {
        "tmva-xml"
    }

    fn serialize(&self, ensemble: &Ensemble) -> Result<String, FormatError> {
        Ok(serialize_ensemble(ensemble))
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }

    fn description(&self) -> &'static str {
        "TMVA BDT weight file (XML)"
    }
}
