use lassy_protocol::NodeError;
use lassy_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("bad xml attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document has no `node` element under its wrapper.
    #[error("document has no root node")]
    MissingRoot,

    #[error("node element is missing its '{attribute}' attribute")]
    MissingAttribute { attribute: &'static str },

    #[error("attribute '{attribute}' is not a number: '{value}'")]
    BadNumber { attribute: &'static str, value: String },

    #[error("malformed node: {0}")]
    Malformed(#[from] NodeError),

    #[error("cannot parse type '{input}': {message}")]
    Type { input: String, message: String },

    #[error("invalid type '{input}': {source}")]
    InvalidType {
        input: String,
        #[source]
        source: TypeError,
    },
}
