//! Small hand-built trees shared by the unit tests.

use lassy_protocol::{ParseNode, ParseTree};

/// R(A(C), B)
pub fn r_a_b_c() -> ParseTree {
    let mut tree = ParseTree::new(ParseNode::new("R", "top").with_cat("top")).unwrap();
    let r = tree.root();
    let a = tree.add_child(r, ParseNode::new("A", "--").with_cat("np")).unwrap();
    tree.add_child(r, ParseNode::new("B", "--").with_word("b").with_lemma("b").with_pos("noun"))
        .unwrap();
    tree.add_child(a, ParseNode::new("C", "hd").with_word("c").with_lemma("c").with_pos("noun"))
        .unwrap();
    tree
}

/// "Jan wil slapen ." with the infinitival subject as a coindexed placeholder.
pub fn control_verb() -> ParseTree {
    let mut tree = ParseTree::new(ParseNode::new("0", "top").with_cat("top"))
        .unwrap()
        .with_sentence("Jan wil slapen .");
    let top = tree.root();
    let smain = tree.add_child(top, ParseNode::new("1", "--").with_cat("smain")).unwrap();
    tree.add_child(
        smain,
        ParseNode::new("2", "su")
            .with_word("Jan")
            .with_lemma("Jan")
            .with_pos("name")
            .with_index("1")
            .with_span(0, 1),
    )
    .unwrap();
    tree.add_child(
        smain,
        ParseNode::new("3", "hd").with_word("wil").with_lemma("willen").with_pos("verb").with_span(1, 2),
    )
    .unwrap();
    let inf = tree.add_child(smain, ParseNode::new("4", "vc").with_cat("inf")).unwrap();
    tree.add_child(
        smain,
        ParseNode::new("5", "--").with_word(".").with_lemma(".").with_pos("punct").with_span(3, 4),
    )
    .unwrap();
    tree.add_child(inf, ParseNode::new("6", "su").with_index("1")).unwrap();
    tree.add_child(
        inf,
        ParseNode::new("7", "hd").with_word("slapen").with_lemma("slapen").with_pos("verb").with_span(2, 3),
    )
    .unwrap();
    tree
}

/// P1 has the content node `n1` (rel su); P2 holds the placeholder `n2` (rel obj).
pub fn coindex_pair() -> ParseTree {
    let mut tree = ParseTree::new(ParseNode::new("0", "top").with_cat("top")).unwrap();
    let top = tree.root();
    let p1 = tree.add_child(top, ParseNode::new("P1", "--").with_cat("smain")).unwrap();
    tree.add_child(p1, ParseNode::new("n1", "su").with_cat("np").with_index("1")).unwrap();
    tree.add_child(p1, ParseNode::new("v", "hd").with_word("ziet").with_lemma("zien").with_pos("verb"))
        .unwrap();
    let p2 = tree.add_child(p1, ParseNode::new("P2", "vc").with_cat("inf")).unwrap();
    tree.add_child(p2, ParseNode::new("n2", "obj").with_index("1")).unwrap();
    tree
}
