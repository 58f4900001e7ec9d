//! Arena-backed document model.
//!
//! A [`Document`] owns one [`Arena`] and one root object. Every object,
//! array, entry and value is a slab slot in that arena, addressed through a
//! typed `Copy` handle stamped with the arena's id. Handles never dangle while
//! the document is alive, and [`Document::dispose`] consumes the document so
//! nothing borrowing it can outlive the arena.

mod access;
mod build;
pub(crate) mod node;
mod export;
mod writer;

use std::fmt;

use smol_str::SmolStr;

use crate::arena::{Arena, ArenaStats, Slab};
use crate::error::{Error, Result};
use crate::options::DocumentOptions;

use node::{ArrayNode, NamedEntry, ObjectNode, UnnamedEntry, ValueNode};

pub use writer::Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Object,
    Array,
    Integer,
    Double,
    String,
    Boolean,
    Null,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::Integer => "number_integer",
            ValueType::Double => "number_double",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, ValueType::Object | ValueType::Array)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) trait Handle: Copy {
    const WHAT: &'static str;
    fn arena(self) -> u32;
    fn index(self) -> usize;
}

macro_rules! handle {
    ($name:ident, $what:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            arena: u32,
            index: u32,
        }

        impl $name {
            pub(crate) fn new(arena: u32, index: usize) -> Self {
                Self {
                    arena,
                    index: index as u32,
                }
            }

            pub fn index(self) -> usize {
                self.index as usize
            }
        }

        impl Handle for $name {
            const WHAT: &'static str = $what;

            fn arena(self) -> u32 {
                self.arena
            }

            fn index(self) -> usize {
                self.index as usize
            }
        }
    };
}

handle!(ObjectId, "object");
handle!(ArrayId, "array");
handle!(ValueId, "value");
handle!(NamedEntryId, "named entry");
handle!(UnnamedEntryId, "unnamed entry");

/// Primitive payload accepted by the builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(&'a str),
}

impl Scalar<'_> {
    pub fn value_type(&self) -> ValueType {
        match self {
            Scalar::Null => ValueType::Null,
            Scalar::Boolean(_) => ValueType::Boolean,
            Scalar::Integer(_) => ValueType::Integer,
            Scalar::Double(_) => ValueType::Double,
            Scalar::String(_) => ValueType::String,
        }
    }

    fn to_data(self) -> node::ValueData {
        match self {
            Scalar::Null => node::ValueData::Null,
            Scalar::Boolean(value) => node::ValueData::Boolean(value),
            Scalar::Integer(value) => node::ValueData::Integer(value),
            Scalar::Double(value) => node::ValueData::Double(value),
            Scalar::String(value) => node::ValueData::String(SmolStr::new(value)),
        }
    }
}

impl From<bool> for Scalar<'_> {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(value: &'a str) -> Self {
        Scalar::String(value)
    }
}

/// Anything the printer can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Object(ObjectId),
    Array(ArrayId),
    Value(ValueId),
}

impl From<ObjectId> for Node {
    fn from(id: ObjectId) -> Self {
        Node::Object(id)
    }
}

impl From<ArrayId> for Node {
    fn from(id: ArrayId) -> Self {
        Node::Array(id)
    }
}

impl From<ValueId> for Node {
    fn from(id: ValueId) -> Self {
        Node::Value(id)
    }
}

/// Uniform address of "the i-th child of a container", named or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Named(NamedEntryId),
    Unnamed(UnnamedEntryId),
}

impl Element {
    pub fn has_key(self) -> bool {
        matches!(self, Element::Named(_))
    }
}

impl node::EntryRef {
    pub(crate) fn element(self) -> Element {
        match self {
            node::EntryRef::Named(id) => Element::Named(id),
            node::EntryRef::Unnamed(id) => Element::Unnamed(id),
        }
    }
}

#[derive(Debug)]
pub struct Document {
    arena: Arena,
    root: ObjectId,
    options: DocumentOptions,
}

impl Document {
    pub fn new() -> Result<Self> {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Result<Self> {
        let arena = Arena::with_growth(options.growth)?;
        Self::create(arena, options)
    }

    /// Root a new document in `arena`.
    pub fn create(mut arena: Arena, options: DocumentOptions) -> Result<Self> {
        options.validate()?;
        let entries = Slab::new(options.object_capacity, options.growth)?;
        let index = arena.objects.push(ObjectNode {
            owner: None,
            entries,
        })?;
        let root = ObjectId::new(arena.id(), index);
        tracing::debug!(arena = arena.id(), "created document");
        Ok(Self {
            arena,
            root,
            options,
        })
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn dispose(self) -> ArenaStats {
        self.arena.dispose()
    }

    fn check<H: Handle>(&self, handle: H) -> Result<()> {
        if handle.arena() != self.arena.id() {
            return Err(Error::ForeignHandle {
                expected: self.arena.id(),
                found: handle.arena(),
            });
        }
        Ok(())
    }

    fn resolve<'a, T, H: Handle>(&self, slab: &'a Slab<T>, handle: H) -> Result<&'a T> {
        self.check(handle)?;
        slab.get(handle.index()).ok_or(Error::UnknownHandle {
            what: H::WHAT,
            index: handle.index(),
        })
    }

    pub(crate) fn object_node(&self, id: ObjectId) -> Result<&ObjectNode> {
        self.resolve(&self.arena.objects, id)
    }

    pub(crate) fn array_node(&self, id: ArrayId) -> Result<&ArrayNode> {
        self.resolve(&self.arena.arrays, id)
    }

    pub(crate) fn value_node(&self, id: ValueId) -> Result<&ValueNode> {
        self.resolve(&self.arena.values, id)
    }

    pub(crate) fn named_node(&self, id: NamedEntryId) -> Result<&NamedEntry> {
        self.resolve(&self.arena.named, id)
    }

    pub(crate) fn unnamed_node(&self, id: UnnamedEntryId) -> Result<&UnnamedEntry> {
        self.resolve(&self.arena.unnamed, id)
    }
}
