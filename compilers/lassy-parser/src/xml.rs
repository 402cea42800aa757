use std::path::Path;

use lassy_protocol::{NodeIdx, ParseNode, ParseTree, Rel};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::ParseError;

/// Reads an Alpino/Lassy XML document.
///
/// The document element (`alpino_ds`) is a wrapper: the first `node` element
/// below it becomes the tree root, nested `node` elements become children in
/// document order. Further top-level `node` elements are ignored.
pub fn parse_alpino(xml: &str) -> Result<ParseTree, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tree: Option<ParseTree> = None;
    let mut stack: Vec<NodeIdx> = Vec::new();
    let mut sentence: Option<String> = None;
    let mut in_sentence = false;
    let mut root_done = false;
    let mut skipping = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"node" => {
                if skipping > 0 || root_done {
                    skipping += 1;
                    continue;
                }
                let idx = attach(&mut tree, &stack, read_node(&e)?)?;
                stack.push(idx);
            }
            Event::Empty(e) if e.name().as_ref() == b"node" => {
                if skipping > 0 || root_done {
                    continue;
                }
                attach(&mut tree, &stack, read_node(&e)?)?;
                if stack.is_empty() {
                    root_done = true;
                }
            }
            Event::End(e) if e.name().as_ref() == b"node" => {
                if skipping > 0 {
                    skipping -= 1;
                    continue;
                }
                stack.pop();
                if stack.is_empty() {
                    root_done = true;
                }
            }
            Event::Start(e) if e.name().as_ref() == b"sentence" => in_sentence = true,
            Event::End(e) if e.name().as_ref() == b"sentence" => in_sentence = false,
            Event::Text(t) if in_sentence => sentence = Some(t.unescape()?.into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }

    let mut tree = tree.ok_or(ParseError::MissingRoot)?;
    if let Some(sentence) = sentence {
        tree.set_sentence(sentence);
    }
    Ok(tree)
}

pub fn parse_alpino_file(path: impl AsRef<Path>) -> Result<ParseTree, ParseError> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;
    let tree = parse_alpino(&xml)?;
    debug!(path = %path.display(), nodes = tree.len(), "parsed treebank file");
    Ok(tree)
}

fn attach(
    tree: &mut Option<ParseTree>,
    stack: &[NodeIdx],
    node: ParseNode,
) -> Result<NodeIdx, ParseError> {
    match tree {
        Some(tree) => {
            let parent = stack.last().copied().ok_or(ParseError::MissingRoot)?;
            Ok(tree.add_child(parent, node)?)
        }
        None => {
            let root = ParseTree::new(node)?;
            let idx = root.root();
            *tree = Some(root);
            Ok(idx)
        }
    }
}

fn read_node(e: &BytesStart<'_>) -> Result<ParseNode, ParseError> {
    let mut id = None;
    let mut rel = None;
    let mut node = ParseNode::new("", "");

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => id = Some(value),
            b"rel" => rel = Some(value),
            b"word" => node.word = Some(value),
            b"lemma" => node.lemma = Some(value),
            b"pos" => node.pos = Some(value),
            b"cat" => node.cat = Some(value),
            b"index" => node.index = Some(value),
            b"begin" => node.begin = Some(parse_number("begin", &value)?),
            b"end" => node.end = Some(parse_number("end", &value)?),
            other => node
                .attrs
                .push((String::from_utf8_lossy(other).into_owned(), value)),
        }
    }

    node.id = id.ok_or(ParseError::MissingAttribute { attribute: "id" })?;
    node.rel = Rel::Single(rel.ok_or(ParseError::MissingAttribute { attribute: "rel" })?);
    Ok(node)
}

fn parse_number(attribute: &'static str, value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumber {
        attribute,
        value: value.to_string(),
    })
}
