//! Entity extraction
//!
//! Turns recognizer spans into extracted food items.

pub mod assembler;
pub mod confidence;
pub mod grouper;
pub mod lexicon;
pub mod quantity;
pub mod source;

pub use assembler::{assemble_item, assemble_items, AssemblyError, AssemblyResult};
pub use confidence::score_group;
pub use grouper::group_spans;
pub use lexicon::{tag_text, LexiconEntitySource};
pub use quantity::parse_quantity;
pub use source::{
    DisabledEntitySource, EntityResult, EntitySource, EntitySourceError, HttpEntitySource,
};
