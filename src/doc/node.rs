use smol_str::SmolStr;

use crate::arena::Slab;

use super::{ArrayId, NamedEntryId, ObjectId, UnnamedEntryId, ValueId, ValueType};

/// The entry that holds a value or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryRef {
    Named(NamedEntryId),
    Unnamed(UnnamedEntryId),
}

#[derive(Debug)]
pub(crate) struct ObjectNode {
    /// `None` only for the document root.
    pub owner: Option<EntryRef>,
    pub entries: Slab<NamedEntryId>,
}

#[derive(Debug)]
pub(crate) struct ArrayNode {
    pub owner: EntryRef,
    pub element_type: ValueType,
    pub entries: Slab<UnnamedEntryId>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueData {
    Object(ObjectId),
    Array(ArrayId),
    Integer(i64),
    Double(f64),
    String(SmolStr),
    Boolean(bool),
    Null,
}

impl ValueData {
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueData::Object(_) => ValueType::Object,
            ValueData::Array(_) => ValueType::Array,
            ValueData::Integer(_) => ValueType::Integer,
            ValueData::Double(_) => ValueType::Double,
            ValueData::String(_) => ValueType::String,
            ValueData::Boolean(_) => ValueType::Boolean,
            ValueData::Null => ValueType::Null,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ValueNode {
    pub owner: EntryRef,
    pub data: ValueData,
}

#[derive(Debug)]
pub(crate) struct NamedEntry {
    pub key: SmolStr,
    pub position: usize,
    pub value: ValueId,
    pub context: ObjectId,
}

#[derive(Debug)]
pub(crate) struct UnnamedEntry {
    pub index: usize,
    pub value: ValueId,
    pub context: ArrayId,
}
