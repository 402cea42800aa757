use std::borrow::Cow;
use std::collections::BTreeMap;

use lassy_protocol::{NodeIdx, ParseNode, ParseTree, Rel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attribute name -> value pairs; a node matches if any pair matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(BTreeMap<String, String>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(attribute.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, node: &ParseNode) -> bool {
        self.0
            .iter()
            .any(|(attribute, value)| node.attr(attribute).is_some_and(|v| v == value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Returns a copy of `tree` without the nodes matching `criteria` and
/// everything below them. The root is kept even if it matches.
pub fn remove_subtree(tree: &ParseTree, criteria: &Criteria) -> ParseTree {
    let mut pruned = tree.clone();
    if criteria.is_empty() {
        return pruned;
    }

    let mut removed = 0usize;
    let mut layer = vec![tree.root()];
    while !layer.is_empty() {
        let mut next = Vec::new();
        for parent in layer {
            for &child in tree.children(parent) {
                if criteria.matches(&tree[child]) {
                    pruned.detach(parent, child);
                    removed += 1;
                } else {
                    next.push(child);
                }
            }
        }
        layer = next;
    }

    debug!(removed, "pruned subtrees");
    pruned
}

const ABSTRACT_SUBJECT_CATS: [&str; 2] = ["ppart", "inf"];
const SUBJECT_REL: &str = "su";

/// Drops the coindexed subject children of participle and infinitive phrases.
///
/// Borrows the input when it contains no such phrase.
pub fn remove_abstract_subject(tree: &ParseTree) -> Cow<'_, ParseTree> {
    let phrases: Vec<NodeIdx> = crate::extract_nodes(tree)
        .map(|v| v.node)
        .filter(|&n| {
            tree[n]
                .cat
                .as_deref()
                .is_some_and(|cat| ABSTRACT_SUBJECT_CATS.contains(&cat))
        })
        .collect();
    if phrases.is_empty() {
        return Cow::Borrowed(tree);
    }

    let mut edited = tree.clone();
    for phrase in phrases {
        for &child in tree.children(phrase) {
            let node = &tree[child];
            if node.index.is_some() && matches!(&node.rel, Rel::Single(rel) if rel == SUBJECT_REL) {
                edited.detach(phrase, child);
                debug!(phrase = %tree[phrase].id, subject = %node.id, "removed abstract subject");
            }
        }
    }
    Cow::Owned(edited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract_nodes, fixtures};

    fn reachable(tree: &ParseTree) -> Vec<String> {
        extract_nodes(tree).map(|v| tree[v.node].id.clone()).collect()
    }

    #[test]
    fn test_remove_by_pos() {
        let tree = fixtures::control_verb();
        let pruned = remove_subtree(&tree, &Criteria::new().with("pos", "punct"));
        assert_eq!(reachable(&pruned), vec!["0", "1", "2", "3", "4", "6", "7"]);
        assert_eq!(reachable(&tree).len(), 8);
    }

    #[test]
    fn test_removes_whole_subtree() {
        let tree = fixtures::r_a_b_c();
        let pruned = remove_subtree(&tree, &Criteria::new().with("id", "A"));
        assert_eq!(reachable(&pruned), vec!["R", "B"]);
    }

    #[test]
    fn test_criteria_are_ored() {
        let tree = fixtures::control_verb();
        let criteria: Criteria = [("rel", "hd"), ("cat", "inf")].into_iter().collect();
        let pruned = remove_subtree(&tree, &criteria);
        assert_eq!(reachable(&pruned), vec!["0", "1", "2", "5"]);
    }

    #[test]
    fn test_root_is_never_removed() {
        let tree = fixtures::r_a_b_c();
        let pruned = remove_subtree(&tree, &Criteria::new().with("cat", "top"));
        assert_eq!(pruned, tree);
    }

    #[test]
    fn test_mapping_rel_never_matches() {
        let mut tree = fixtures::r_a_b_c();
        let b = tree.find("B").unwrap();
        *tree.rel_mut(b) = [("R", "--")].into_iter().collect();

        let pruned = remove_subtree(&tree, &Criteria::new().with("rel", "--"));
        assert_eq!(reachable(&pruned), vec!["R", "B"]);
    }

    #[test]
    fn test_remove_abstract_subject() {
        let tree = fixtures::control_verb();
        let edited = remove_abstract_subject(&tree);
        assert!(matches!(edited, Cow::Owned(_)));
        assert_eq!(reachable(&edited), vec!["0", "1", "2", "3", "4", "5", "7"]);
        // Subjects outside ppart/inf phrases stay.
        assert!(reachable(&edited).contains(&"2".to_string()));
    }

    #[test]
    fn test_abstract_subject_fast_path() {
        let tree = fixtures::r_a_b_c();
        assert!(matches!(remove_abstract_subject(&tree), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unindexed_subject_stays() {
        let mut tree = fixtures::control_verb();
        let inf = tree.find("4").unwrap();
        tree.add_child(inf, ParseNode::new("8", "su").with_cat("np")).unwrap();

        let edited = remove_abstract_subject(&tree);
        let ids = reachable(&edited);
        assert!(ids.contains(&"8".to_string()));
        assert!(!ids.contains(&"6".to_string()));
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: Criteria = serde_json::from_str(r#"{"pos": "punct", "rel": "mod"}"#).unwrap();
        assert_eq!(criteria, Criteria::new().with("rel", "mod").with("pos", "punct"));
    }
}
