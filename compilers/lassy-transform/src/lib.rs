//! Tree and DAG transformations over Alpino dependency trees.
//!
//! Every transformation takes its input by reference and returns a new value;
//! the input is never modified.

pub mod coindex;
pub mod decompose;
pub mod error;
pub mod extract;
pub mod graph;
pub mod lexicon;
pub mod pipeline;
pub mod prune;

#[cfg(test)]
mod fixtures;

pub use coindex::tree_to_dag;
pub use decompose::{AssignPolicy, Decomposer, PosTagPolicy};
pub use error::TransformError;
pub use extract::{extract_nodes, group_by_depth, NodeExtractor, Visit};
pub use graph::{DependencyGraph, GraphNode};
pub use lexicon::{count_tokens, lemmas, union_lemmas};
pub use pipeline::{Pipeline, TransformConfig};
pub use prune::{remove_abstract_subject, remove_subtree, Criteria};
