use std::collections::HashMap;

use lassy_protocol::{LabelFields, ParseNode, ParseTree, Rel};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use tracing::debug;

use crate::extract::extract_nodes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

/// Parent -> child graph of a tree or DAG, one edge per incoming relation.
pub struct DependencyGraph {
    sentence: Option<String>,
    graph: Graph<GraphNode, String, Directed>,
    index_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn from_tree(tree: &ParseTree, fields: LabelFields) -> Self {
        let visits: Vec<_> = extract_nodes(tree).collect();
        let mut graph = Graph::new();
        let mut index_map = HashMap::with_capacity(visits.len());

        for visit in &visits {
            let node = &tree[visit.node];
            let label = match visit.parent {
                None => "ROOT".to_string(),
                Some(_) => node_label(node, fields),
            };
            let idx = graph.add_node(GraphNode {
                id: node.id.clone(),
                label,
            });
            index_map.insert(node.id.clone(), idx);
        }

        // Nodes first: a mapping may name a parent reached later in the walk.
        for visit in &visits {
            let Some(parent) = visit.parent else { continue };
            let node = &tree[visit.node];
            let to = index_map[&node.id];
            match &node.rel {
                Rel::Single(label) => {
                    graph.add_edge(index_map[&tree[parent].id], to, label.clone());
                }
                Rel::Multi(edges) => {
                    for edge in edges {
                        match index_map.get(&edge.parent) {
                            Some(&from) => {
                                graph.add_edge(from, to, edge.label.clone());
                            }
                            None => debug!(node = %node.id, parent = %edge.parent, "parent not reachable, edge dropped"),
                        }
                    }
                }
            }
        }

        Self {
            sentence: tree.sentence().map(str::to_string),
            graph,
            index_map,
        }
    }

    pub fn sentence(&self) -> Option<&str> {
        self.sentence.as_deref()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_map.get(id).map(|&idx| &self.graph[idx])
    }

    /// (parent id, label) of every edge ending at `id`.
    pub fn edges_into(&self, id: &str) -> Vec<(&str, &str)> {
        let Some(&idx) = self.index_map.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (self.graph[e.source()].id.as_str(), e.weight().as_str()))
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn graph(&self) -> &Graph<GraphNode, String, Directed> {
        &self.graph
    }
}

fn node_label(node: &ParseNode, fields: LabelFields) -> String {
    let mut label = String::new();
    for (field, name) in LabelFields::ORDER {
        if !fields.contains(field) {
            continue;
        }
        if field == LabelFields::SPAN {
            if let (Some(begin), Some(end)) = (node.begin, node.end) {
                label.push_str(&format!("{begin}-{end}\n"));
            }
        } else if let Some(value) = node.attr(name) {
            label.push_str(&value);
            label.push('\n');
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coindex::tree_to_dag;
    use crate::fixtures;

    #[test]
    fn test_tree_export() {
        let tree = fixtures::control_verb();
        let graph = DependencyGraph::from_tree(&tree, LabelFields::default());

        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(graph.sentence(), Some("Jan wil slapen ."));
        assert_eq!(graph.node("0").unwrap().label, "ROOT");
        assert_eq!(graph.node("2").unwrap().label, "2\nJan\nname\n1\n");
        assert_eq!(graph.node("4").unwrap().label, "4\ninf\n");
    }

    #[test]
    fn test_dag_has_shared_edges() {
        let dag = tree_to_dag(&fixtures::control_verb()).unwrap();
        let graph = DependencyGraph::from_tree(&dag, LabelFields::default());

        // The placeholder is gone, its edge now ends at the subject.
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(graph.edges_into("2"), vec![("1", "su"), ("4", "su")]);
    }

    #[test]
    fn test_span_and_lemma_fields() {
        let tree = fixtures::control_verb();
        let graph = DependencyGraph::from_tree(&tree, LabelFields::LEMMA | LabelFields::SPAN);
        assert_eq!(graph.node("3").unwrap().label, "willen\n1-2\n");
        assert_eq!(graph.node("1").unwrap().label, "");
    }
}
