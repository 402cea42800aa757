//! Readers for Lassy data: Alpino XML parse trees and word types in their
//! printed form.

pub mod error;
pub mod typestr;
pub mod xml;

pub use error::ParseError;
pub use typestr::TypeGrammar;
pub use xml::{parse_alpino, parse_alpino_file};
