use std::collections::VecDeque;

use lassy_protocol::{NodeIdx, ParseTree};

/// A node reached during traversal, with the parent it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: NodeIdx,
    pub parent: Option<NodeIdx>,
    pub depth: usize,
}

/// Breadth-first walk from the root: all nodes of depth `d` come before any
/// node of depth `d + 1`, and within a layer nodes keep the order of their
/// parents' child lists.
#[derive(Debug, Clone)]
pub struct NodeExtractor<'t> {
    tree: &'t ParseTree,
    queue: VecDeque<Visit>,
}

impl<'t> Iterator for NodeExtractor<'t> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let visit = self.queue.pop_front()?;
        self.queue
            .extend(self.tree.children(visit.node).iter().map(|&child| Visit {
                node: child,
                parent: Some(visit.node),
                depth: visit.depth + 1,
            }));
        Some(visit)
    }
}

pub fn extract_nodes(tree: &ParseTree) -> NodeExtractor<'_> {
    let root = Visit {
        node: tree.root(),
        parent: None,
        depth: 0,
    };
    NodeExtractor {
        tree,
        queue: VecDeque::from([root]),
    }
}

/// Splits visits into layers of equal depth, shallowest first.
pub fn group_by_depth(visits: impl IntoIterator<Item = Visit>) -> Vec<Vec<Visit>> {
    let mut visits: Vec<Visit> = visits.into_iter().collect();
    visits.sort_by_key(|v| v.depth);

    let mut layers: Vec<Vec<Visit>> = Vec::new();
    for visit in visits {
        match layers.last_mut() {
            Some(layer) if layer[0].depth == visit.depth => layer.push(visit),
            _ => layers.push(vec![visit]),
        }
    }
    layers
}
