use rkyv::{Archive, Deserialize, Serialize};
use crate::fields::NodeKind;
use crate::ids::NodeIdx;
use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, Index};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Structural problems detected while building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A node carries both `word` and `cat`.
    WordAndCat { id: String },
    DuplicateId { id: String },
    UnknownParent { parent: NodeIdx },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::WordAndCat { id } => {
                write!(f, "node '{}' carries both a word and a category", id)
            }
            NodeError::DuplicateId { id } => write!(f, "node id '{}' occurs twice", id),
            NodeError::UnknownParent { parent } => {
                write!(f, "parent slot {} is not part of the tree", parent.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NodeError {}

/// One incoming edge of a resolved node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Incoming {
    pub parent: String,
    pub label: String,
}

/// Dependency relation of a node to its parent(s).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[archive(check_bytes)]
pub enum Rel {
    /// Edge label to the unique parent.
    Single(String),
    /// Parent id -> label, sorted by parent id.
    Multi(Vec<Incoming>),
}

impl Rel {
    pub fn single(label: impl Into<String>) -> Self {
        Rel::Single(label.into())
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Rel::Single(label) => Some(label),
            Rel::Multi(_) => None,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Rel::Multi(_))
    }

    /// Label of the edge coming from `parent`, if any.
    pub fn get(&self, parent: &str) -> Option<&str> {
        match self {
            Rel::Single(_) => None,
            Rel::Multi(edges) => edges
                .binary_search_by(|e| e.parent.as_str().cmp(parent))
                .ok()
                .map(|pos| edges[pos].label.as_str()),
        }
    }

    /// Adds an incoming edge, turning a scalar relation into an empty mapping first.
    /// An edge from an already known parent keeps its existing label.
    pub fn insert(&mut self, parent: impl Into<String>, label: impl Into<String>) {
        if let Rel::Single(_) = self {
            *self = Rel::Multi(Vec::new());
        }
        if let Rel::Multi(edges) = self {
            let parent = parent.into();
            if let Err(pos) = edges.binary_search_by(|e| e.parent.cmp(&parent)) {
                edges.insert(pos, Incoming { parent, label: label.into() });
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Rel::Single(_) => 1,
            Rel::Multi(edges) => edges.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> impl Iterator<Item = &Incoming> {
        match self {
            Rel::Multi(edges) => edges.iter(),
            Rel::Single(_) => <&[Incoming]>::default().iter(),
        }
    }
}

impl<P: Into<String>, L: Into<String>> FromIterator<(P, L)> for Rel {
    fn from_iter<I: IntoIterator<Item = (P, L)>>(iter: I) -> Self {
        let mut rel = Rel::Multi(Vec::new());
        for (parent, label) in iter {
            rel.insert(parent, label);
        }
        rel
    }
}

/// A node of an Alpino dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ParseNode {
    pub id: String,
    pub rel: Rel,
    pub word: Option<String>,
    pub lemma: Option<String>,
    pub pos: Option<String>,
    pub cat: Option<String>,
    pub index: Option<String>,
    pub begin: Option<u32>,
    pub end: Option<u32>,
    /// Remaining XML attributes in document order.
    pub attrs: Vec<(String, String)>,
}

impl ParseNode {
    pub fn new(id: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel: Rel::Single(rel.into()),
            word: None,
            lemma: None,
            pos: None,
            cat: None,
            index: None,
            begin: None,
            end: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn with_cat(mut self, cat: impl Into<String>) -> Self {
        self.cat = Some(cat.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_span(mut self, begin: u32, end: u32) -> Self {
        self.begin = Some(begin);
        self.end = Some(end);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn kind(&self) -> NodeKind {
        match (&self.word, &self.cat) {
            (Some(_), _) => NodeKind::Leaf,
            (None, Some(_)) => NodeKind::Phrase,
            (None, None) => NodeKind::Placeholder,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.word.is_some()
    }

    /// Whether this node is the content-bearing member of a coindex group.
    pub fn has_content(&self) -> bool {
        self.word.is_some() || self.cat.is_some()
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.word.is_some() && self.cat.is_some() {
            return Err(NodeError::WordAndCat { id: self.id.clone() });
        }
        Ok(())
    }

    /// Looks an attribute up by its XML name.
    /// A mapping-valued `rel` has no string form and yields `None`.
    pub fn attr(&self, name: &str) -> Option<Cow<'_, str>> {
        let fixed = match name {
            "id" => Some(self.id.as_str()),
            "rel" => return self.rel.as_single().map(Cow::Borrowed),
            "word" => self.word.as_deref(),
            "lemma" => self.lemma.as_deref(),
            "pos" => self.pos.as_deref(),
            "cat" => self.cat.as_deref(),
            "index" => self.index.as_deref(),
            "begin" => return self.begin.map(|b| Cow::Owned(b.to_string())),
            "end" => return self.end.map(|e| Cow::Owned(e.to_string())),
            _ => {
                return self
                    .attrs
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| Cow::Borrowed(value.as_str()))
            }
        };
        fixed.map(Cow::Borrowed)
    }
}

/// Arena-backed parse tree. Detaching a node only edits its parent's child
/// list; the arena slot stays but is no longer reachable from the root.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ParseTree {
    sentence: Option<String>,
    nodes: Vec<ParseNode>,
    children: Vec<Vec<NodeIdx>>,
    // id -> arena slot, detached nodes included
    ids: BTreeMap<String, NodeIdx>,
    root: NodeIdx,
}

impl ParseTree {
    pub fn new(root: ParseNode) -> Result<Self, NodeError> {
        root.validate()?;
        let mut ids = BTreeMap::new();
        ids.insert(root.id.clone(), NodeIdx(0));
        Ok(Self {
            sentence: None,
            nodes: alloc::vec![root],
            children: alloc::vec![Vec::new()],
            ids,
            root: NodeIdx(0),
        })
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    pub fn sentence(&self) -> Option<&str> {
        self.sentence.as_deref()
    }

    pub fn set_sentence(&mut self, sentence: impl Into<String>) {
        self.sentence = Some(sentence.into());
    }

    /// Appends `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIdx, node: ParseNode) -> Result<NodeIdx, NodeError> {
        if parent.index() >= self.nodes.len() {
            return Err(NodeError::UnknownParent { parent });
        }
        node.validate()?;
        if self.ids.contains_key(&node.id) {
            return Err(NodeError::DuplicateId { id: node.id });
        }

        let idx = NodeIdx(self.nodes.len() as u32);
        self.ids.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.children[parent.index()].push(idx);
        Ok(idx)
    }

    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn node(&self, idx: NodeIdx) -> &ParseNode {
        &self.nodes[idx.index()]
    }

    /// Only the relation is editable in place; ids and word/cat stay as validated.
    pub fn rel_mut(&mut self, idx: NodeIdx) -> &mut Rel {
        &mut self.nodes[idx.index()].rel
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.children[idx.index()]
    }

    /// Removes `child` from the child list of `parent`. Returns false if it was not there.
    pub fn detach(&mut self, parent: NodeIdx, child: NodeIdx) -> bool {
        let siblings = &mut self.children[parent.index()];
        match siblings.iter().position(|&c| c == child) {
            Some(pos) => {
                siblings.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: &str) -> Option<NodeIdx> {
        self.ids.get(id).copied()
    }

    /// Number of arena slots, detached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All arena slots in insertion order, detached nodes included.
    pub fn arena(&self) -> impl Iterator<Item = (NodeIdx, &ParseNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIdx(i as u32), n))
    }
}

impl Index<NodeIdx> for ParseTree {
    type Output = ParseNode;

    fn index(&self, idx: NodeIdx) -> &ParseNode {
        self.node(idx)
    }
}

/// A parse tree whose coindexed nodes were merged, so nodes may have several parents.
/// Only readable: there is no way back to a mutable [`ParseTree`].
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ParseDag {
    tree: ParseTree,
}

impl ParseDag {
    pub fn from_resolved(tree: ParseTree) -> Self {
        Self { tree }
    }
}

impl Deref for ParseDag {
    type Target = ParseTree;

    fn deref(&self) -> &ParseTree {
        &self.tree
    }
}
