use smol_str::SmolStr;

use crate::arena::Slab;
use crate::error::{Error, Result};

use super::node::{ArrayNode, EntryRef, NamedEntry, ObjectNode, UnnamedEntry, ValueData, ValueNode};
use super::{ArrayId, Document, Handle, NamedEntryId, ObjectId, Scalar, UnnamedEntryId, ValueId, ValueType};

/// What a new entry will hold once it is attached.
enum Child<'a> {
    Scalar(Scalar<'a>),
    Object(Slab<NamedEntryId>),
    Array(ValueType, Slab<UnnamedEntryId>),
}

impl Child<'_> {
    fn reserve(&self, doc: &mut Document) -> Result<()> {
        match self {
            Child::Scalar(_) => Ok(()),
            Child::Object(_) => doc.arena.objects.reserve(1),
            Child::Array(..) => doc.arena.arrays.reserve(1),
        }
    }
}

// Every append checks and reserves first, then pushes into reserved space, so
// a failed call leaves the document exactly as it was.
impl Document {
    pub fn add_null(&mut self, object: ObjectId, key: &str) -> Result<ValueId> {
        self.add_scalar(object, key, Scalar::Null)
    }

    pub fn add_boolean(&mut self, object: ObjectId, key: &str, data: bool) -> Result<ValueId> {
        self.add_scalar(object, key, Scalar::Boolean(data))
    }

    pub fn add_integer(&mut self, object: ObjectId, key: &str, data: i64) -> Result<ValueId> {
        self.add_scalar(object, key, Scalar::Integer(data))
    }

    pub fn add_double(&mut self, object: ObjectId, key: &str, data: f64) -> Result<ValueId> {
        self.add_scalar(object, key, Scalar::Double(data))
    }

    /// The string is copied into the document.
    pub fn add_string(&mut self, object: ObjectId, key: &str, data: &str) -> Result<ValueId> {
        self.add_scalar(object, key, Scalar::String(data))
    }

    /// Non-finite doubles are rejected with `IllegalArgument`.
    pub fn add_scalar(&mut self, object: ObjectId, key: &str, data: Scalar<'_>) -> Result<ValueId> {
        check_scalar(&data)?;
        self.append_named(object, key, Child::Scalar(data))
    }

    pub fn add_object(&mut self, object: ObjectId, key: &str) -> Result<ObjectId> {
        let entries = Slab::new(self.options.object_capacity, self.options.growth)?;
        let value = self.append_named(object, key, Child::Object(entries))?;
        self.value_as_object(value).ok_or_else(|| missing_child(value))
    }

    pub fn add_array(&mut self, object: ObjectId, key: &str, element_type: ValueType) -> Result<ArrayId> {
        check_element_type(element_type)?;
        let entries = Slab::new(self.options.array_capacity, self.options.growth)?;
        let value = self.append_named(object, key, Child::Array(element_type, entries))?;
        self.value_as_array(value).ok_or_else(|| missing_child(value))
    }

    /// Append a primitive matching the array's declared element type.
    pub fn array_add_value<'a>(&mut self, array: ArrayId, data: impl Into<Scalar<'a>>) -> Result<ValueId> {
        let data = data.into();
        let element_type = self.array_node(array)?.element_type;
        if element_type.is_container() {
            return Err(Error::wrong_usage(format!(
                "array of {element_type} takes complex values through array_add_{element_type}"
            )));
        }
        if data.value_type() != element_type {
            return Err(Error::WrongType {
                expected: element_type,
                found: data.value_type(),
            });
        }
        check_scalar(&data)?;
        self.append_unnamed(array, Child::Scalar(data))
    }

    pub fn array_add_null(&mut self, array: ArrayId) -> Result<ValueId> {
        self.array_add_value(array, Scalar::Null)
    }

    pub fn array_add_object(&mut self, array: ArrayId) -> Result<ObjectId> {
        self.expect_element_type(array, ValueType::Object)?;
        let entries = Slab::new(self.options.object_capacity, self.options.growth)?;
        let value = self.append_unnamed(array, Child::Object(entries))?;
        self.value_as_object(value).ok_or_else(|| missing_child(value))
    }

    pub fn array_add_array(&mut self, array: ArrayId, element_type: ValueType) -> Result<ArrayId> {
        check_element_type(element_type)?;
        self.expect_element_type(array, ValueType::Array)?;
        let entries = Slab::new(self.options.array_capacity, self.options.growth)?;
        let value = self.append_unnamed(array, Child::Array(element_type, entries))?;
        self.value_as_array(value).ok_or_else(|| missing_child(value))
    }

    fn expect_element_type(&self, array: ArrayId, found: ValueType) -> Result<()> {
        let expected = self.array_node(array)?.element_type;
        if expected != found {
            return Err(Error::WrongType { expected, found });
        }
        Ok(())
    }

    fn append_named(&mut self, object: ObjectId, key: &str, child: Child<'_>) -> Result<ValueId> {
        self.object_node(object)?;
        child.reserve(self)?;
        self.arena.named.reserve(1)?;
        self.arena.values.reserve(1)?;

        let arena_id = self.arena.id();
        let entry = NamedEntryId::new(arena_id, self.arena.named.len());
        let value = ValueId::new(arena_id, self.arena.values.len());
        let parent = self
            .arena
            .objects
            .get_mut(object.index())
            .ok_or_else(|| unknown(object))?;
        parent.entries.reserve(1)?;
        let position = parent.entries.push_reserved(entry);
        let data = self.attach_child(child, EntryRef::Named(entry));
        self.arena.values.push_reserved(ValueNode {
            owner: EntryRef::Named(entry),
            data,
        });
        self.arena.named.push_reserved(NamedEntry {
            key: SmolStr::new(key),
            position,
            value,
            context: object,
        });
        Ok(value)
    }

    fn append_unnamed(&mut self, array: ArrayId, child: Child<'_>) -> Result<ValueId> {
        self.array_node(array)?;
        child.reserve(self)?;
        self.arena.unnamed.reserve(1)?;
        self.arena.values.reserve(1)?;

        let arena_id = self.arena.id();
        let entry = UnnamedEntryId::new(arena_id, self.arena.unnamed.len());
        let value = ValueId::new(arena_id, self.arena.values.len());
        let parent = self
            .arena
            .arrays
            .get_mut(array.index())
            .ok_or_else(|| unknown(array))?;
        parent.entries.reserve(1)?;
        let index = parent.entries.push_reserved(entry);
        let data = self.attach_child(child, EntryRef::Unnamed(entry));
        self.arena.values.push_reserved(ValueNode {
            owner: EntryRef::Unnamed(entry),
            data,
        });
        self.arena.unnamed.push_reserved(UnnamedEntry {
            index,
            value,
            context: array,
        });
        Ok(value)
    }

    /// Push a nested container into reserved space and describe it as value data.
    fn attach_child(&mut self, child: Child<'_>, owner: EntryRef) -> ValueData {
        let arena_id = self.arena.id();
        match child {
            Child::Scalar(scalar) => scalar.to_data(),
            Child::Object(entries) => {
                let index = self.arena.objects.push_reserved(ObjectNode {
                    owner: Some(owner),
                    entries,
                });
                ValueData::Object(ObjectId::new(arena_id, index))
            }
            Child::Array(element_type, entries) => {
                let index = self.arena.arrays.push_reserved(ArrayNode {
                    owner,
                    element_type,
                    entries,
                });
                ValueData::Array(ArrayId::new(arena_id, index))
            }
        }
    }
}

fn check_element_type(element_type: ValueType) -> Result<()> {
    if element_type == ValueType::None {
        return Err(Error::NoType);
    }
    Ok(())
}

fn check_scalar(data: &Scalar<'_>) -> Result<()> {
    match data {
        Scalar::Double(double) if !double.is_finite() => {
            Err(Error::illegal_argument(format!("double {double} is not finite")))
        }
        _ => Ok(()),
    }
}

fn unknown<H: Handle>(handle: H) -> Error {
    Error::UnknownHandle {
        what: H::WHAT,
        index: handle.index(),
    }
}

fn missing_child(value: ValueId) -> Error {
    Error::Internal(format!("value {} lost its container", value.index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rstest::rstest;

    #[rstest]
    fn test_object_counts_successful_adds() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        doc.add_integer(root, "a", 1).unwrap();
        doc.add_string(root, "b", "two").unwrap();
        doc.add_null(root, "c").unwrap();
        doc.add_object(root, "d").unwrap();
        assert_eq!(doc.object_len(root).unwrap(), 4);
    }

    #[rstest]
    #[case(Scalar::Integer(1))]
    #[case(Scalar::Double(1.5))]
    #[case(Scalar::Boolean(true))]
    #[case(Scalar::Null)]
    fn test_string_array_rejects_other_scalars(#[case] scalar: Scalar<'static>) {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let array = doc.add_array(root, "tags", ValueType::String).unwrap();
        doc.array_add_value(array, "ok").unwrap();
        let err = doc.array_add_value(array, scalar).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongType);
        assert_eq!(doc.array_len(array).unwrap(), 1);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_doubles_are_rejected(#[case] double: f64) {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        doc.add_double(root, "rating", 7.8).unwrap();
        let err = doc.add_double(root, "score", double).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
        assert_eq!(doc.object_len(root).unwrap(), 1);

        let xs = doc.add_array(root, "xs", ValueType::Double).unwrap();
        doc.array_add_value(xs, 2.5).unwrap();
        let err = doc.array_add_value(xs, double).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
        assert_eq!(doc.array_len(xs).unwrap(), 1);
        assert_eq!(doc.render(root).unwrap(), r#"{ "rating": 7.8, "xs": [ 2.5 ] }"#);
    }

    #[rstest]
    fn test_primitive_into_object_array_is_wrong_usage() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let array = doc.add_array(root, "items", ValueType::Object).unwrap();
        let err = doc.array_add_value(array, 3i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongUsage);
        assert_eq!(doc.array_len(array).unwrap(), 0);
    }

    #[rstest]
    fn test_complex_add_checks_element_type() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let array = doc.add_array(root, "numbers", ValueType::Integer).unwrap();
        assert_eq!(doc.array_add_object(array).unwrap_err().kind(), ErrorKind::WrongType);
        assert_eq!(
            doc.array_add_array(array, ValueType::Integer).unwrap_err().kind(),
            ErrorKind::WrongType
        );
        assert_eq!(doc.array_len(array).unwrap(), 0);
    }

    #[rstest]
    fn test_array_of_none_has_no_type() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let err = doc.add_array(root, "x", ValueType::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoType);
        assert_eq!(doc.object_len(root).unwrap(), 0);
    }

    #[rstest]
    fn test_growth_preserves_entry_identity() {
        let options = crate::DocumentOptions::new().with_object_capacity(1);
        let mut doc = Document::with_options(options).unwrap();
        let root = doc.root();
        let first = doc.add_integer(root, "first", 1).unwrap();
        let before = doc.object_entries(root).unwrap()[0];
        for i in 0..40 {
            doc.add_integer(root, "n", i).unwrap();
        }
        assert!(doc.object_capacity(root).unwrap() >= 41);
        assert_eq!(doc.object_entries(root).unwrap()[0], before);
        assert_eq!(doc.value_as_integer(first), 1);
    }

    #[rstest]
    fn test_foreign_handle_is_rejected() {
        let mut left = Document::new().unwrap();
        let right = Document::new().unwrap();
        let err = left.add_null(right.root(), "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullArgument);
    }

    #[rstest]
    fn test_duplicate_keys_keep_insertion_order() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        doc.add_integer(root, "k", 1).unwrap();
        doc.add_integer(root, "k", 2).unwrap();
        let keys: Vec<_> = doc
            .object_entries(root)
            .unwrap()
            .iter()
            .map(|&entry| doc.named_entry_key(entry).unwrap().to_string())
            .collect();
        assert_eq!(keys, ["k", "k"]);
    }
}
