use std::fmt::Write as _;

use crate::error::{Error, Result};

use super::node::{EntryRef, ValueData};
use super::{ArrayId, Document, Element, NamedEntryId, ObjectId, UnnamedEntryId, ValueId, ValueType};

impl Document {
    /// Named entries of `object` in insertion order.
    pub fn object_entries(&self, object: ObjectId) -> Result<&[NamedEntryId]> {
        Ok(self.object_node(object)?.entries.as_slice())
    }

    pub fn object_len(&self, object: ObjectId) -> Result<usize> {
        Ok(self.object_node(object)?.entries.len())
    }

    pub fn object_capacity(&self, object: ObjectId) -> Result<usize> {
        Ok(self.object_node(object)?.entries.capacity())
    }

    pub fn array_entries(&self, array: ArrayId) -> Result<&[UnnamedEntryId]> {
        Ok(self.array_node(array)?.entries.as_slice())
    }

    pub fn array_len(&self, array: ArrayId) -> Result<usize> {
        Ok(self.array_node(array)?.entries.len())
    }

    pub fn array_capacity(&self, array: ArrayId) -> Result<usize> {
        Ok(self.array_node(array)?.entries.capacity())
    }

    pub fn array_element_type(&self, array: ArrayId) -> Result<ValueType> {
        Ok(self.array_node(array)?.element_type)
    }

    pub fn named_entry_key(&self, entry: NamedEntryId) -> Result<&str> {
        Ok(self.named_node(entry)?.key.as_str())
    }

    pub fn named_entry_value(&self, entry: NamedEntryId) -> Result<ValueId> {
        Ok(self.named_node(entry)?.value)
    }

    pub fn unnamed_entry_value(&self, entry: UnnamedEntryId) -> Result<ValueId> {
        Ok(self.unnamed_node(entry)?.value)
    }

    pub fn unnamed_entry_index(&self, entry: UnnamedEntryId) -> Result<usize> {
        Ok(self.unnamed_node(entry)?.index)
    }

    pub fn value_type(&self, value: ValueId) -> Result<ValueType> {
        Ok(self.value_node(value)?.data.value_type())
    }

    // Narrowing accessors return a sentinel instead of failing; check
    // `value_type` first when the difference matters.

    pub fn value_as_integer(&self, value: ValueId) -> i64 {
        match self.value_data(value) {
            Some(ValueData::Integer(integer)) => *integer,
            _ => 0,
        }
    }

    pub fn value_as_double(&self, value: ValueId) -> f64 {
        match self.value_data(value) {
            Some(ValueData::Double(double)) => *double,
            _ => f64::NAN,
        }
    }

    pub fn value_as_string(&self, value: ValueId) -> Option<&str> {
        match self.value_data(value) {
            Some(ValueData::String(string)) => Some(string.as_str()),
            _ => None,
        }
    }

    pub fn value_as_boolean(&self, value: ValueId) -> bool {
        matches!(self.value_data(value), Some(ValueData::Boolean(true)))
    }

    pub fn value_as_object(&self, value: ValueId) -> Option<ObjectId> {
        match self.value_data(value) {
            Some(ValueData::Object(object)) => Some(*object),
            _ => None,
        }
    }

    pub fn value_as_array(&self, value: ValueId) -> Option<ArrayId> {
        match self.value_data(value) {
            Some(ValueData::Array(array)) => Some(*array),
            _ => None,
        }
    }

    pub(crate) fn value_data(&self, value: ValueId) -> Option<&ValueData> {
        self.value_node(value).ok().map(|node| &node.data)
    }

    /// The element whose entry owns `value`.
    pub fn element_of(&self, value: ValueId) -> Result<Element> {
        Ok(self.value_node(value)?.owner.element())
    }

    pub fn element_key(&self, element: Element) -> Result<Option<&str>> {
        match element {
            Element::Named(entry) => Ok(Some(self.named_entry_key(entry)?)),
            Element::Unnamed(entry) => {
                self.unnamed_node(entry)?;
                Ok(None)
            }
        }
    }

    /// Position of the element inside its container.
    pub fn element_index(&self, element: Element) -> Result<usize> {
        match element {
            Element::Named(entry) => Ok(self.named_node(entry)?.position),
            Element::Unnamed(entry) => Ok(self.unnamed_node(entry)?.index),
        }
    }

    pub fn element_value(&self, element: Element) -> Result<ValueId> {
        match element {
            Element::Named(entry) => self.named_entry_value(entry),
            Element::Unnamed(entry) => self.unnamed_entry_value(entry),
        }
    }

    pub fn element_type(&self, element: Element) -> Result<ValueType> {
        self.value_type(self.element_value(element)?)
    }

    /// One element per named entry of `object`.
    pub fn fullscan(&self, object: ObjectId) -> Result<Vec<Element>> {
        Ok(self
            .object_entries(object)?
            .iter()
            .map(|&entry| Element::Named(entry))
            .collect())
    }

    /// Walk owner links from `value` up to the root object.
    pub fn root_of(&self, value: ValueId) -> Result<ObjectId> {
        let mut owner = Some(self.value_node(value)?.owner);
        let mut object = self.root;
        while let Some(entry) = owner {
            owner = match entry {
                EntryRef::Named(id) => {
                    object = self.named_node(id)?.context;
                    self.object_node(object)?.owner
                }
                EntryRef::Unnamed(id) => {
                    let array = self.unnamed_node(id)?.context;
                    Some(self.array_node(array)?.owner)
                }
            };
        }
        Ok(object)
    }

    /// Number of containers between the root object and `value`; the root's
    /// direct children are at depth 0.
    pub fn depth_of(&self, value: ValueId) -> Result<usize> {
        Ok(self.owner_chain(self.value_node(value)?.owner)?.len() - 1)
    }

    /// `$`-rooted path such as `$.movies[1].actors`.
    pub fn path_of(&self, element: Element) -> Result<String> {
        let entry = match element {
            Element::Named(id) => EntryRef::Named(id),
            Element::Unnamed(id) => EntryRef::Unnamed(id),
        };
        let chain = self.owner_chain(entry)?;
        let mut path = String::from("$");
        for entry in chain.iter().rev() {
            match *entry {
                EntryRef::Named(id) => {
                    let _ = write!(path, ".{}", self.named_node(id)?.key);
                }
                EntryRef::Unnamed(id) => {
                    let _ = write!(path, "[{}]", self.unnamed_node(id)?.index);
                }
            }
        }
        Ok(path)
    }

    /// Entries from `entry` upward, ending at a child of the root.
    fn owner_chain(&self, entry: EntryRef) -> Result<Vec<EntryRef>> {
        let mut chain = vec![entry];
        let mut current = entry;
        loop {
            let next = match current {
                EntryRef::Named(id) => self.object_node(self.named_node(id)?.context)?.owner,
                EntryRef::Unnamed(id) => Some(self.array_node(self.unnamed_node(id)?.context)?.owner),
            };
            match next {
                Some(parent) => {
                    if chain.len() > self.arena.values.len() {
                        return Err(Error::Internal("owner chain does not terminate".into()));
                    }
                    chain.push(parent);
                    current = parent;
                }
                None => return Ok(chain),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn nested() -> (Document, ValueId, ArrayId) {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let movies = doc.add_array(root, "movies", ValueType::Object).unwrap();
        doc.array_add_object(movies).unwrap();
        let second = doc.array_add_object(movies).unwrap();
        let keywords = doc.add_array(second, "keywords", ValueType::String).unwrap();
        doc.array_add_value(keywords, "cop").unwrap();
        let last = doc.array_add_value(keywords, "murder").unwrap();
        (doc, last, movies)
    }

    #[rstest]
    fn test_narrowing_sentinels() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let text = doc.add_string(root, "s", "x").unwrap();
        assert_eq!(doc.value_as_integer(text), 0);
        assert!(doc.value_as_double(text).is_nan());
        assert!(!doc.value_as_boolean(text));
        assert_eq!(doc.value_as_object(text), None);
        assert_eq!(doc.value_as_array(text), None);
        assert_eq!(doc.value_as_string(text), Some("x"));
    }

    #[rstest]
    fn test_owner_walk_reaches_root() {
        let (doc, last, _) = nested();
        assert_eq!(doc.root_of(last).unwrap(), doc.root());
        assert_eq!(doc.depth_of(last).unwrap(), 3);
    }

    #[rstest]
    fn test_path_of_nested_element() {
        let (doc, last, _) = nested();
        let element = doc.element_of(last).unwrap();
        assert_eq!(doc.path_of(element).unwrap(), "$.movies[1].keywords[1]");
        assert_eq!(doc.element_index(element).unwrap(), 1);
        assert_eq!(doc.element_key(element).unwrap(), None);
        assert_eq!(doc.element_type(element).unwrap(), ValueType::String);
    }

    #[rstest]
    fn test_fullscan_yields_named_elements() {
        let (doc, _, movies) = nested();
        let elements = doc.fullscan(doc.root()).unwrap();
        assert_eq!(elements.len(), 1);
        assert!(elements[0].has_key());
        assert_eq!(doc.element_key(elements[0]).unwrap(), Some("movies"));
        let value = doc.element_value(elements[0]).unwrap();
        assert_eq!(doc.value_as_array(value), Some(movies));
    }
}
