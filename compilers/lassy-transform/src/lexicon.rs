use std::collections::BTreeSet;

use lassy_protocol::ParseTree;

use crate::extract::extract_nodes;

/// Lemmas of every reachable node that has one.
pub fn lemmas(tree: &ParseTree) -> BTreeSet<String> {
    extract_nodes(tree)
        .filter_map(|v| tree[v.node].lemma.clone())
        .collect()
}

pub fn union_lemmas<'t>(trees: impl IntoIterator<Item = &'t ParseTree>) -> BTreeSet<String> {
    trees.into_iter().flat_map(lemmas).collect()
}

/// Number of reachable leaves.
pub fn count_tokens(tree: &ParseTree) -> usize {
    extract_nodes(tree).filter(|v| tree[v.node].is_leaf()).count()
}
