use std::collections::{BTreeMap, HashMap};

use lassy_protocol::{NodeIdx, ParseDag, ParseTree, Rel};
use tracing::debug;

use crate::error::TransformError;
use crate::extract::{extract_nodes, Visit};

/// Turns coindexed nodes into shared nodes.
///
/// Each coindex group keeps only the member carrying a word or category; the
/// other members are detached and their incoming edges move to it. Every
/// non-root node reached from the root ends up with a mapping-valued `rel`.
/// A tree without coindexed nodes is returned as is.
pub fn tree_to_dag(tree: &ParseTree) -> Result<ParseDag, TransformError> {
    let visits: Vec<Visit> = extract_nodes(tree).collect();

    let mut groups: BTreeMap<&str, Vec<NodeIdx>> = BTreeMap::new();
    for visit in &visits {
        if let Some(index) = tree[visit.node].index.as_deref() {
            groups.entry(index).or_default().push(visit.node);
        }
    }
    if groups.is_empty() {
        return Ok(ParseDag::from_resolved(tree.clone()));
    }

    let canonical = canonical_members(tree, &groups)?;

    // Edges are gathered from the untouched input first, so the order in
    // which placeholders and their content node are reached does not matter.
    let mut dag = tree.clone();
    let mut edges: Vec<(NodeIdx, &str, &str)> = Vec::with_capacity(visits.len());
    let mut merged = 0usize;

    for visit in visits.iter().skip(1) {
        let Some(parent) = visit.parent else { continue };
        let node = &tree[visit.node];
        let Rel::Single(label) = &node.rel else { continue };

        let target = match node.index.as_deref().and_then(|i| canonical.get(i)) {
            Some(&content) if content != visit.node => {
                dag.detach(parent, visit.node);
                merged += 1;
                content
            }
            _ => visit.node,
        };
        edges.push((target, tree[parent].id.as_str(), label.as_str()));
    }

    for (target, parent_id, label) in edges {
        dag.rel_mut(target).insert(parent_id, label);
    }

    debug!(groups = groups.len(), merged, "resolved coindexation");
    Ok(ParseDag::from_resolved(dag))
}

fn canonical_members<'t>(
    tree: &'t ParseTree,
    groups: &BTreeMap<&'t str, Vec<NodeIdx>>,
) -> Result<HashMap<&'t str, NodeIdx>, TransformError> {
    let mut canonical = HashMap::with_capacity(groups.len());
    for (&index, members) in groups {
        let content: Vec<NodeIdx> = members
            .iter()
            .copied()
            .filter(|&m| tree[m].has_content())
            .collect();

        match content.as_slice() {
            [single] => {
                canonical.insert(index, *single);
            }
            _ => {
                let reported = if content.is_empty() { members } else { &content };
                return Err(TransformError::AmbiguousCoindex {
                    index: index.to_string(),
                    candidates: reported.iter().map(|&m| tree[m].id.clone()).collect(),
                });
            }
        }
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use lassy_protocol::ParseNode;

    fn ids(dag: &ParseDag) -> Vec<String> {
        extract_nodes(dag).map(|v| dag[v.node].id.clone()).collect()
    }

    #[test]
    fn test_placeholder_merges_into_content_node() {
        let tree = fixtures::coindex_pair();
        let dag = tree_to_dag(&tree).unwrap();

        let n1 = dag.find("n1").unwrap();
        let expected: Rel = [("P1", "su"), ("P2", "obj")].into_iter().collect();
        assert_eq!(dag[n1].rel, expected);

        assert!(!ids(&dag).contains(&"n2".to_string()));
        let p2 = dag.find("P2").unwrap();
        assert!(dag.children(p2).is_empty());
    }

    #[test]
    fn test_every_node_gets_a_mapping() {
        let dag = tree_to_dag(&fixtures::control_verb()).unwrap();

        for visit in extract_nodes(&dag).skip(1) {
            let node = &dag[visit.node];
            assert!(node.rel.is_multi(), "node {} kept a scalar rel", node.id);
            assert!(!node.rel.is_empty());
        }

        let jan = dag.find("2").unwrap();
        assert_eq!(dag[jan].rel.get("1"), Some("su"));
        assert_eq!(dag[jan].rel.get("4"), Some("su"));
        assert_eq!(dag[dag.root()].rel, Rel::single("top"));
    }

    #[test]
    fn test_input_is_untouched() {
        let tree = fixtures::coindex_pair();
        let before = tree.clone();
        let _ = tree_to_dag(&tree).unwrap();
        assert_eq!(tree, before);
    }

    #[test]
    fn test_without_coindex_is_unchanged() {
        let tree = fixtures::r_a_b_c();
        let dag = tree_to_dag(&tree).unwrap();
        assert_eq!(*dag, tree);
    }

    #[test]
    fn test_placeholder_before_content_node() {
        // The placeholder sits one layer above the content node.
        let mut tree = ParseTree::new(ParseNode::new("0", "top").with_cat("top")).unwrap();
        let top = tree.root();
        let a = tree.add_child(top, ParseNode::new("a", "--").with_cat("smain")).unwrap();
        tree.add_child(a, ParseNode::new("ph", "obj1").with_index("3")).unwrap();
        let b = tree.add_child(a, ParseNode::new("b", "vc").with_cat("ppart")).unwrap();
        tree.add_child(b, ParseNode::new("np", "su").with_cat("np").with_index("3")).unwrap();

        let dag = tree_to_dag(&tree).unwrap();
        let np = dag.find("np").unwrap();
        let expected: Rel = [("a", "obj1"), ("b", "su")].into_iter().collect();
        assert_eq!(dag[np].rel, expected);
    }

    #[test]
    fn test_two_content_members_is_ambiguous() {
        let mut tree = fixtures::coindex_pair();
        let p2 = tree.find("P2").unwrap();
        tree.add_child(p2, ParseNode::new("n3", "obj1").with_cat("np").with_index("1")).unwrap();

        match tree_to_dag(&tree).unwrap_err() {
            TransformError::AmbiguousCoindex { index, candidates } => {
                assert_eq!(index, "1");
                assert_eq!(candidates, vec!["n1".to_string(), "n3".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_group_without_content_is_ambiguous() {
        let mut tree = fixtures::r_a_b_c();
        let r = tree.root();
        tree.add_child(r, ParseNode::new("x", "su").with_index("9")).unwrap();
        tree.add_child(r, ParseNode::new("y", "obj1").with_index("9")).unwrap();

        let err = tree_to_dag(&tree).unwrap_err();
        assert!(matches!(err, TransformError::AmbiguousCoindex { ref index, .. } if index == "9"));
    }
}
