use std::borrow::Cow;

use lassy_protocol::{ParseDag, ParseTree};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coindex::tree_to_dag;
use crate::error::TransformError;
use crate::prune::{remove_abstract_subject, remove_subtree, Criteria};

/// Which transformations run, in order: pruning, abstract subject removal,
/// coindex resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub prune: Criteria,
    pub remove_abstract_subjects: bool,
    pub resolve_coindex: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            prune: Criteria::new().with("pos", "punct").with("rel", "mod"),
            remove_abstract_subjects: true,
            resolve_coindex: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: TransformConfig,
}

impl Pipeline {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn run(&self, tree: &ParseTree) -> Result<ParseDag, TransformError> {
        let mut current = remove_subtree(tree, &self.config.prune);
        if self.config.remove_abstract_subjects {
            if let Cow::Owned(edited) = remove_abstract_subject(&current) {
                current = edited;
            }
        }

        let dag = if self.config.resolve_coindex {
            tree_to_dag(&current)?
        } else {
            ParseDag::from_resolved(current)
        };
        debug!(sentence = ?tree.sentence(), "pipeline finished");
        Ok(dag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_nodes;
    use crate::fixtures;

    fn reachable(tree: &ParseTree) -> Vec<String> {
        extract_nodes(tree).map(|v| tree[v.node].id.clone()).collect()
    }

    #[test]
    fn test_default_pipeline() {
        let dag = Pipeline::default().run(&fixtures::control_verb()).unwrap();

        // Punctuation and the abstract subject are gone before resolution,
        // so the former coindex group has a single member.
        assert_eq!(reachable(&dag), vec!["0", "1", "2", "3", "4", "7"]);
        let jan = dag.find("2").unwrap();
        assert_eq!(dag[jan].rel.len(), 1);
        assert_eq!(dag[jan].rel.get("1"), Some("su"));
    }

    #[test]
    fn test_tree_without_participles_passes_through() {
        let tree = fixtures::r_a_b_c();
        let config = TransformConfig {
            prune: Criteria::new(),
            ..TransformConfig::default()
        };
        let dag = Pipeline::new(config).run(&tree).unwrap();
        assert_eq!(*dag, tree);
    }

    #[test]
    fn test_keep_abstract_subjects() {
        let config = TransformConfig {
            remove_abstract_subjects: false,
            ..TransformConfig::default()
        };
        let dag = Pipeline::new(config).run(&fixtures::control_verb()).unwrap();
        let jan = dag.find("2").unwrap();
        assert_eq!(dag[jan].rel.len(), 2);
    }

    #[test]
    fn test_without_resolution_rel_stays_scalar() {
        let config = TransformConfig {
            prune: Criteria::new(),
            remove_abstract_subjects: false,
            resolve_coindex: false,
        };
        let tree = fixtures::control_verb();
        let dag = Pipeline::new(config).run(&tree).unwrap();
        assert_eq!(*dag, tree);
    }

    #[test]
    fn test_config_from_json() {
        let config: TransformConfig = serde_json::from_str(r#"{"resolve_coindex": false}"#).unwrap();
        assert!(!config.resolve_coindex);
        assert!(config.remove_abstract_subjects);
        assert_eq!(config.prune, TransformConfig::default().prune);

        let config: TransformConfig = serde_json::from_str(r#"{"prune": {"cat": "du"}}"#).unwrap();
        assert_eq!(config.prune, Criteria::new().with("cat", "du"));
    }
}
