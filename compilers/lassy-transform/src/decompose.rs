use std::collections::BTreeMap;

use lassy_protocol::{NodeIdx, ParseTree};
use lassy_types::WordType;
use tracing::debug;

use crate::error::TransformError;
use crate::extract::extract_nodes;

/// Assigns a word type to one leaf of a tree.
pub trait AssignPolicy {
    fn assign(&self, tree: &ParseTree, leaf: NodeIdx) -> Result<WordType, TransformError>;
}

impl<F> AssignPolicy for F
where
    F: Fn(&ParseTree, NodeIdx) -> Result<WordType, TransformError>,
{
    fn assign(&self, tree: &ParseTree, leaf: NodeIdx) -> Result<WordType, TransformError> {
        self(tree, leaf)
    }
}

/// Types every leaf with its part-of-speech tag as an atomic type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosTagPolicy;

impl AssignPolicy for PosTagPolicy {
    fn assign(&self, tree: &ParseTree, leaf: NodeIdx) -> Result<WordType, TransformError> {
        let node = &tree[leaf];
        node.pos
            .as_deref()
            .map(WordType::atomic)
            .ok_or_else(|| TransformError::UnknownTraversalMode {
                node: node.id.clone(),
                reason: "leaf has no pos tag".to_string(),
            })
    }
}

pub struct Decomposer<P> {
    policy: P,
}

impl<P: AssignPolicy> Decomposer<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Leaves in traversal order.
    pub fn leaves(tree: &ParseTree) -> impl Iterator<Item = NodeIdx> + '_ {
        extract_nodes(tree)
            .map(|v| v.node)
            .filter(|&n| tree[n].is_leaf())
    }

    /// Maps each leaf's lemma to the type the policy assigns it.
    /// A lemma seen twice keeps the type of its last occurrence.
    pub fn decompose(&self, tree: &ParseTree) -> Result<BTreeMap<String, WordType>, TransformError> {
        let mut lexicon = BTreeMap::new();
        for leaf in Self::leaves(tree) {
            let node = &tree[leaf];
            let lemma = node
                .lemma
                .as_ref()
                .ok_or_else(|| TransformError::UnknownTraversalMode {
                    node: node.id.clone(),
                    reason: "leaf has no lemma".to_string(),
                })?;
            let ty = self.policy.assign(tree, leaf)?;
            lexicon.insert(lemma.clone(), ty);
        }
        debug!(entries = lexicon.len(), "decomposed tree");
        Ok(lexicon)
    }
}
