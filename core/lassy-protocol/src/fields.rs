#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// What a node is, derived from which of `word` / `cat` it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Terminal carrying a `word`.
    Leaf,
    /// Internal node carrying a phrasal `cat`.
    Phrase,
    /// Bare coindex reference: neither `word` nor `cat`.
    Placeholder,
}

bitflags! {
    /// Attributes shown in a node label when a tree is exported as a graph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct LabelFields: u32 {
        const ID = 1;
        const WORD = 2;
        const LEMMA = 4;
        const POS = 8;
        const CAT = 16;
        const INDEX = 32;
        // Rendered as "begin-end"
        const SPAN = 64;
    }
}

impl Default for LabelFields {
    fn default() -> Self {
        LabelFields::ID | LabelFields::WORD | LabelFields::POS | LabelFields::CAT | LabelFields::INDEX
    }
}

impl LabelFields {
    /// Attribute names in the order they appear in a label.
    pub const ORDER: [(LabelFields, &'static str); 7] = [
        (LabelFields::ID, "id"),
        (LabelFields::WORD, "word"),
        (LabelFields::LEMMA, "lemma"),
        (LabelFields::POS, "pos"),
        (LabelFields::CAT, "cat"),
        (LabelFields::INDEX, "index"),
        (LabelFields::SPAN, "span"),
    ];
}
