#![no_std]

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod fields;
pub mod ids;

// Re-export core types for convenience
pub use fields::{LabelFields, NodeKind};
pub use ids::NodeIdx;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use rkyv::{from_bytes, to_bytes};

    fn small_tree() -> ParseTree {
        let mut tree = ParseTree::new(ParseNode::new("0", "--").with_cat("smain")).unwrap();
        let root = tree.root();
        tree.add_child(root, ParseNode::new("1", "su").with_word("Jan").with_lemma("Jan").with_pos("name"))
            .unwrap();
        tree.add_child(root, ParseNode::new("2", "hd").with_word("slaapt").with_lemma("slapen").with_pos("verb"))
            .unwrap();
        tree
    }

    #[test]
    fn test_tree_serialization() {
        let original = small_tree().with_sentence("Jan slaapt");

        let bytes = to_bytes::<_, 1024>(&original).expect("Failed to serialize ParseTree");
        let deserialized: ParseTree = from_bytes(&bytes).expect("Failed to deserialize ParseTree");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_id_layout() {
        // NodeIdx(u32) should be exactly 4 bytes
        assert_eq!(core::mem::size_of::<NodeIdx>(), 4);
    }

    #[test]
    fn test_word_and_cat_rejected() {
        let node = ParseNode::new("7", "hd").with_word("loopt").with_cat("np");
        assert_eq!(
            ParseTree::new(node).unwrap_err(),
            NodeError::WordAndCat { id: "7".to_string() }
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut tree = small_tree();
        let root = tree.root();
        let err = tree.add_child(root, ParseNode::new("1", "mod").with_word("nu")).unwrap_err();
        assert!(matches!(err, NodeError::DuplicateId { .. }));
    }

    #[test]
    fn test_find_by_id_on_wide_tree() {
        let mut tree = ParseTree::new(ParseNode::new("top", "top").with_cat("top")).unwrap();
        let root = tree.root();
        for i in 0..2000u32 {
            tree.add_child(root, ParseNode::new(i.to_string(), "--").with_word("w")).unwrap();
        }

        assert_eq!(tree.find("top"), Some(root));
        assert_eq!(tree.find("1999"), Some(NodeIdx(2000)));
        assert_eq!(tree.find("2000"), None);

        // Detached nodes keep their slot and their id.
        assert!(tree.detach(root, NodeIdx(5)));
        assert_eq!(tree.find("4"), Some(NodeIdx(5)));
        assert!(tree.add_child(root, ParseNode::new("4", "mod").with_word("x")).is_err());
    }

    #[test]
    fn test_node_kind() {
        let tree = small_tree();
        assert_eq!(tree[tree.root()].kind(), NodeKind::Phrase);
        assert_eq!(tree[NodeIdx(1)].kind(), NodeKind::Leaf);
        assert_eq!(ParseNode::new("9", "su").with_index("1").kind(), NodeKind::Placeholder);
    }

    #[test]
    fn test_detach_keeps_sibling_order() {
        let mut tree = small_tree();
        let root = tree.root();
        let extra = tree.add_child(root, ParseNode::new("3", "mod").with_word("nu")).unwrap();

        assert!(tree.detach(root, NodeIdx(2)));
        assert!(!tree.detach(root, NodeIdx(2)));
        assert_eq!(tree.children(root), &[NodeIdx(1), extra]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_rel_mapping_is_order_independent() {
        let a: Rel = [("P2", "obj1"), ("P1", "su")].into_iter().collect();
        let b: Rel = [("P1", "su"), ("P2", "obj1")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.get("P1"), Some("su"));
        assert_eq!(a.get("P3"), None);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_rel_insert_keeps_existing_label() {
        let mut rel = Rel::single("su");
        rel.insert("4", "su");
        rel.insert("4", "obj1");
        assert_eq!(rel.get("4"), Some("su"));
        assert_eq!(rel.len(), 1);
    }

    #[test]
    fn test_attr_lookup() {
        let node = ParseNode::new("5", "hd")
            .with_word("loopt")
            .with_pos("verb")
            .with_span(2, 3)
            .with_attr("postag", "WW(pv,tgw,met-t)");

        assert_eq!(node.attr("pos").as_deref(), Some("verb"));
        assert_eq!(node.attr("rel").as_deref(), Some("hd"));
        assert_eq!(node.attr("begin").as_deref(), Some("2"));
        assert_eq!(node.attr("postag").as_deref(), Some("WW(pv,tgw,met-t)"));
        assert_eq!(node.attr("cat"), None);
    }

    #[test]
    fn test_default_label_fields() {
        let fields = LabelFields::default();
        assert!(fields.contains(LabelFields::WORD));
        assert!(!fields.contains(LabelFields::SPAN));
    }
}
