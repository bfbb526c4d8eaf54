//! Verified dump samples shared by unit and integration tests

use crate::ensemble::VariableTable;

/// A tree that is a single leaf.
pub const SINGLE_LEAF: &str = "0:leaf=0.5";

/// `0:[a<1]` with two leaves one indent deep.
pub const DEPTH_ONE: &str = "0:[a<1] yes=1,no=2\n\t1:leaf=0.1\n\t2:leaf=0.2\n";

/// Breadth-first ids declared depth-first, with `missing` clauses.
pub const OUT_OF_ORDER: &str = "0:[a<0.25] yes=1,no=2,missing=1\n\
                                \t1:[b<-3e-2] yes=3,no=4,missing=4\n\
                                \t\t3:leaf=0.3\n\
                                \t\t4:[a<7.5] yes=5,no=6,missing=5\n\
                                \t\t\t5:leaf=-0.45\n\
                                \t\t\t6:leaf=1.5e-3\n\
                                \t2:leaf=+0.2\n";

/// A whole-model dump with `booster[N]` markers and three trees.
pub const MULTI_TREE_DUMP: &str = "booster[0]:\n\
                                   0:[f0<0.5] yes=1,no=2,missing=1\n\
                                   \t1:[f2<-1.25] yes=3,no=4,missing=3\n\
                                   \t\t3:leaf=0.1428\n\
                                   \t\t4:leaf=-0.05\n\
                                   \t2:leaf=-0.1875\n\
                                   booster[1]:\n\
                                   0:[f1<3.5e+01] yes=1,no=2,missing=2\n\
                                   \t1:leaf=0.0923\n\
                                   \t2:[f0<1.5] yes=5,no=6,missing=5\n\
                                   \t\t5:leaf=-0.011\n\
                                   \t\t6:leaf=0.2\n\
                                   booster[2]:\n\
                                   0:leaf=0.003\n";

/// Variables for [`DEPTH_ONE`] and [`OUT_OF_ORDER`].
pub fn ab_variables() -> VariableTable {
    VariableTable::from_pairs([("a", 'F'), ("b", 'F')]).expect("sample names are unique")
}

/// Variables for [`MULTI_TREE_DUMP`].
pub fn multi_tree_variables() -> VariableTable {
    VariableTable::from_pairs([("f0", 'F'), ("f1", 'I'), ("f2", 'F')])
        .expect("sample names are unique")
}
