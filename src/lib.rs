pub mod arena;
pub mod decode;
pub mod doc;
pub mod error;
pub mod options;
pub mod query;

use std::io::{Read, Write};

use serde_json::Value;

pub use crate::arena::{Arena, ArenaStats, BlockId};
pub use crate::doc::{
    ArrayId, Document, Element, NamedEntryId, Node, ObjectId, Scalar, UnnamedEntryId, ValueId, ValueType,
    Writer,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::options::{BoolStyle, DocumentOptions, DoubleFormat, GrowthPolicy, PrintOptions};
pub use crate::query::{Descent, EntryKind, Filter, Predicate, Query, ResultSet, TraversalPolicy};

pub fn from_str(input: &str) -> Result<Document> {
    decode::from_str(input)
}

pub fn from_str_with_options(input: &str, options: DocumentOptions) -> Result<Document> {
    decode::from_str_with_options(input, options)
}

pub fn from_slice(input: &[u8]) -> Result<Document> {
    decode::from_slice(input)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    decode::from_reader(reader)
}

pub fn from_value(value: &Value) -> Result<Document> {
    decode::from_value(value)
}

/// Renders the whole document in the default textual form.
pub fn to_string(doc: &Document) -> Result<String> {
    doc.render(doc.root())
}

pub fn to_string_with_options(doc: &Document, options: PrintOptions) -> Result<String> {
    doc.render_with(doc.root(), options)
}

pub fn to_writer<W: Write>(writer: W, doc: &Document) -> Result<()> {
    doc.print(writer, doc.root())
}

/// Runs `query` from the document root.
pub fn select(doc: &Document, query: &Query, policy: TraversalPolicy) -> Result<ResultSet> {
    query.execute(doc, doc.root(), policy)
}
